use crate::error::TableError;
use connectors::sql::base::{
    destination::DataDestination,
    encoder::SqlLiteralEncoder,
    query::{generator::QueryGenerator, statement::Statement},
};
use engine_config::settings::InsertMode;
use model::{records::window::RowWindow, schema::table::TableDescriptor};
use tracing::debug;

/// Upper bound on bind parameters in one PostgreSQL statement.
pub const MAX_BIND_PARAMS: usize = 65_535;

/// Writes windows into the table transaction the caller opened. Never
/// commits or rolls back.
#[derive(Debug, Clone, Copy)]
pub struct BatchInserter {
    mode: InsertMode,
    generator: QueryGenerator,
    encoder: SqlLiteralEncoder,
}

impl BatchInserter {
    pub fn new(mode: InsertMode) -> Self {
        BatchInserter {
            mode,
            generator: QueryGenerator::new(mode.ident_style()),
            encoder: SqlLiteralEncoder::new(),
        }
    }

    /// Rows per statement in parameterized mode.
    fn rows_per_statement(&self, table: &TableDescriptor) -> usize {
        (MAX_BIND_PARAMS / table.column_count().max(1)).max(1)
    }

    /// Statements for one window: a single multi-row insert, or in
    /// parameterized mode as many as the bind limit requires.
    pub fn statements(&self, table: &TableDescriptor, window: &RowWindow) -> Vec<Statement> {
        if window.is_empty() {
            return Vec::new();
        }

        match self.mode {
            InsertMode::Literal => {
                vec![self.generator.insert_literal(table, &window.rows, &self.encoder)]
            }
            InsertMode::Parameterized => window
                .rows
                .chunks(self.rows_per_statement(table))
                .map(|chunk| self.generator.insert_params(table, chunk))
                .collect(),
        }
    }

    /// Returns the number of rows the destination reported written.
    pub async fn insert<D>(&self, destination: &mut D, table: &TableDescriptor, window: &RowWindow) -> Result<u64, TableError>
    where
        D: DataDestination + ?Sized,
    {
        let statements = self.statements(table, window);
        let mut written = 0;

        for statement in &statements {
            written += destination
                .execute(statement)
                .await
                .map_err(|source| TableError::Insert {
                    table: table.name.clone(),
                    offset: window.offset,
                    source,
                })?;
        }

        debug!(
            table = %table.name,
            offset = window.offset,
            rows = window.len(),
            statements = statements.len(),
            mode = %self.mode,
            "Inserted window"
        );
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::{
        core::value::Value,
        records::row::Row,
        schema::column::ColumnDescriptor,
    };

    fn wide_table(columns: usize) -> TableDescriptor {
        let columns = (0..columns)
            .map(|i| ColumnDescriptor::new(format!("c{i}"), "integer".to_string(), true))
            .collect();
        TableDescriptor::new("public", "wide", columns)
    }

    fn window(rows: usize, columns: usize) -> RowWindow {
        let rows = (0..rows)
            .map(|r| Row::new(vec![Value::Int(r as i64); columns]))
            .collect();
        RowWindow::new(0, 1000, rows)
    }

    #[test]
    fn test_literal_mode_builds_one_statement() {
        let inserter = BatchInserter::new(InsertMode::Literal);
        let table = wide_table(2);
        let statements = inserter.statements(&table, &window(3, 2));

        assert_eq!(statements.len(), 1);
        assert_eq!(
            statements[0].sql,
            "INSERT INTO wide (c0,c1) VALUES (0,0),(1,1),(2,2)"
        );
        assert!(statements[0].params.is_empty());
        assert_eq!(statements[0].rows, 3);
    }

    #[test]
    fn test_parameterized_mode_splits_at_bind_limit() {
        let inserter = BatchInserter::new(InsertMode::Parameterized);
        // 100 columns allow 655 rows per statement
        let table = wide_table(100);
        let statements = inserter.statements(&table, &window(1000, 100));

        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0].rows, 655);
        assert_eq!(statements[1].rows, 345);
        assert!(statements.iter().all(|s| s.params.len() <= MAX_BIND_PARAMS));
        assert!(statements[1].sql.contains("CAST($1::text AS integer)"));
    }

    #[test]
    fn test_empty_window_builds_nothing() {
        let inserter = BatchInserter::new(InsertMode::Parameterized);
        assert!(inserter.statements(&wide_table(2), &window(0, 2)).is_empty());
    }
}
