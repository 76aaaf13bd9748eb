use model::core::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    CreateTable,
    Insert,
}

/// A destination statement together with what it is expected to do.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub kind: StatementKind,
    pub table: String,
    pub sql: String,
    /// Bound in order to `$1..$n`; empty for fully literal statements.
    pub params: Vec<Value>,
    /// Rows carried by an insert; 0 for DDL.
    pub rows: usize,
}

impl Statement {
    pub fn create_table(table: &str, sql: String) -> Self {
        Statement {
            kind: StatementKind::CreateTable,
            table: table.to_string(),
            sql,
            params: Vec::new(),
            rows: 0,
        }
    }

    pub fn insert(table: &str, sql: String, params: Vec<Value>, rows: usize) -> Self {
        Statement {
            kind: StatementKind::Insert,
            table: table.to_string(),
            sql,
            params,
            rows,
        }
    }
}
