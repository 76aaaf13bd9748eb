use crate::schema::column::ColumnDescriptor;
use serde::{Deserialize, Serialize};

/// Ordered column metadata for one source table. Built once when the table's
/// migration starts and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescriptor {
    pub schema: String,
    pub name: String,
    pub columns: Vec<ColumnDescriptor>,
    /// Primary key columns in key order; empty when the table has none.
    #[serde(default)]
    pub primary_key: Vec<String>,
}

impl TableDescriptor {
    pub fn new(schema: &str, name: &str, columns: Vec<ColumnDescriptor>) -> Self {
        Self {
            schema: schema.to_string(),
            name: name.to_string(),
            columns,
            primary_key: Vec::new(),
        }
    }

    pub fn with_primary_key(mut self, columns: Vec<String>) -> Self {
        self.primary_key = columns;
        self
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}
