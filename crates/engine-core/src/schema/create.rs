use crate::error::TableError;
use connectors::sql::base::{
    destination::DataDestination,
    query::generator::{IdentStyle, QueryGenerator},
};
use model::schema::table::TableDescriptor;
use tracing::debug;

/// Mirrors a source table on the destination. Column types are copied
/// verbatim; an existing table with the same name is left alone.
#[derive(Debug, Clone, Copy)]
pub struct TableCreator {
    generator: QueryGenerator,
}

impl TableCreator {
    pub fn new(style: IdentStyle) -> Self {
        TableCreator {
            generator: QueryGenerator::new(style),
        }
    }

    pub async fn ensure_exists<D>(&self, destination: &mut D, table: &TableDescriptor) -> Result<(), TableError>
    where
        D: DataDestination + ?Sized,
    {
        let statement = self.generator.create_table(table);
        debug!(table = %table.name, sql = %statement.sql, "Ensuring destination table exists");

        destination
            .execute(&statement)
            .await
            .map_err(|source| TableError::SchemaCreation {
                table: table.name.clone(),
                source,
            })?;
        Ok(())
    }
}
