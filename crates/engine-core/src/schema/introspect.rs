use crate::error::TableError;
use connectors::sql::base::{error::DbError, source::DataSource};
use model::schema::table::TableDescriptor;
use tracing::debug;

/// Reads table lists and column metadata from the source catalog, limited
/// to one namespace.
#[derive(Debug, Clone)]
pub struct SchemaIntrospector {
    schema: String,
}

impl SchemaIntrospector {
    pub fn new(schema: &str) -> Self {
        SchemaIntrospector {
            schema: schema.to_string(),
        }
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub async fn list_tables<S>(&self, source: &mut S) -> Result<Vec<String>, DbError>
    where
        S: DataSource + ?Sized,
    {
        let tables = source.list_tables(&self.schema).await?;
        debug!(schema = %self.schema, count = tables.len(), "Enumerated source tables");
        Ok(tables)
    }

    pub async fn describe<S>(&self, source: &mut S, table: &str) -> Result<TableDescriptor, TableError>
    where
        S: DataSource + ?Sized,
    {
        let descriptor = source
            .describe(&self.schema, table)
            .await
            .map_err(|err| TableError::SchemaIntrospection {
                table: table.to_string(),
                reason: err.to_string(),
                source: Some(err),
            })?;

        if descriptor.columns.is_empty() {
            return Err(TableError::SchemaIntrospection {
                table: table.to_string(),
                reason: format!("no columns found in schema '{}'", self.schema),
                source: None,
            });
        }

        debug!(
            table,
            columns = descriptor.column_count(),
            primary_key = ?descriptor.primary_key,
            "Introspected table"
        );
        Ok(descriptor)
    }
}
