use crate::sql::base::{
    encoder::LiteralEncoder,
    query::statement::Statement,
};
use model::{core::value::Value, records::row::Row, schema::table::TableDescriptor};

/// How identifiers are written into generated SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentStyle {
    /// Written as the catalog spells them, unquoted.
    Bare,
    /// Double-quoted, with embedded double quotes doubled.
    Quoted,
}

/// Builds the handful of statements a migration needs.
#[derive(Debug, Clone, Copy)]
pub struct QueryGenerator {
    style: IdentStyle,
}

impl QueryGenerator {
    pub fn new(style: IdentStyle) -> Self {
        Self { style }
    }

    pub fn quoted() -> Self {
        Self::new(IdentStyle::Quoted)
    }

    pub fn bare() -> Self {
        Self::new(IdentStyle::Bare)
    }

    pub fn ident(&self, name: &str) -> String {
        match self.style {
            IdentStyle::Bare => name.to_string(),
            IdentStyle::Quoted => format!("\"{}\"", name.replace('"', "\"\"")),
        }
    }

    /// `schema.table`, used for reads against the source catalog namespace.
    pub fn qualified(&self, table: &TableDescriptor) -> String {
        format!("{}.{}", self.ident(&table.schema), self.ident(&table.name))
    }

    fn column_list(&self, table: &TableDescriptor) -> String {
        table
            .columns
            .iter()
            .map(|c| self.ident(&c.name))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// `CREATE TABLE IF NOT EXISTS` with the declared types copied verbatim.
    /// The destination table is created unqualified, in the destination's
    /// default namespace.
    pub fn create_table(&self, table: &TableDescriptor) -> Statement {
        let column_defs = table
            .columns
            .iter()
            .map(|c| {
                format!(
                    "{} {} {}",
                    self.ident(&c.name),
                    c.declared_type,
                    c.nullability()
                )
            })
            .collect::<Vec<_>>()
            .join(", ");

        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} ({column_defs})",
            self.ident(&table.name)
        );
        Statement::create_table(&table.name, sql)
    }

    pub fn count_rows(&self, table: &TableDescriptor) -> String {
        format!("SELECT COUNT(*) FROM {}", self.qualified(table))
    }

    /// One window of rows. `select_exprs` line up with the table's columns;
    /// `order_by` must give a total, repeatable order or windows may overlap.
    pub fn select_window(
        &self,
        table: &TableDescriptor,
        select_exprs: &[String],
        order_by: &[String],
        offset: u64,
        limit: u64,
    ) -> String {
        let mut sql = format!(
            "SELECT {} FROM {}",
            select_exprs.join(", "),
            self.qualified(table)
        );
        if !order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&order_by.join(", "));
        }
        sql.push_str(&format!(" LIMIT {limit} OFFSET {offset}"));
        sql
    }

    /// Multi-row insert with every value written as a literal.
    pub fn insert_literal(
        &self,
        table: &TableDescriptor,
        rows: &[Row],
        encoder: &dyn LiteralEncoder,
    ) -> Statement {
        let tuples = rows
            .iter()
            .map(|row| {
                let values = (0..table.columns.len())
                    .map(|i| encoder.encode_optional(row.get(i)))
                    .collect::<Vec<_>>();
                format!("({})", values.join(","))
            })
            .collect::<Vec<_>>();

        let sql = format!(
            "INSERT INTO {} ({}) VALUES {}",
            self.ident(&table.name),
            self.column_list(table),
            tuples.join(",")
        );
        Statement::insert(&table.name, sql, Vec::new(), rows.len())
    }

    /// Multi-row insert with every value bound as a text parameter and cast
    /// on the server to the column's full type, modifiers included, so an
    /// over-length value is rejected by the destination column rather than
    /// cut short by the cast.
    pub fn insert_params(&self, table: &TableDescriptor, rows: &[Row]) -> Statement {
        let mut params = Vec::with_capacity(rows.len() * table.columns.len());
        let mut tuples = Vec::with_capacity(rows.len());

        for row in rows {
            let placeholders = table
                .columns
                .iter()
                .enumerate()
                .map(|(i, column)| {
                    params.push(row.get(i).cloned().unwrap_or(Value::Null));
                    format!("CAST(${}::text AS {})", params.len(), column.cast_target())
                })
                .collect::<Vec<_>>();
            tuples.push(format!("({})", placeholders.join(",")));
        }

        let sql = format!(
            "INSERT INTO {} ({}) VALUES {}",
            self.ident(&table.name),
            self.column_list(table),
            tuples.join(",")
        );
        Statement::insert(&table.name, sql, params, rows.len())
    }
}
