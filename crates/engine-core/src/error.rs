use connectors::sql::base::error::{ConnectorError, DbError};
use model::execution::connection::EndpointRole;
use thiserror::Error;

/// Failure confined to one table. The table's destination transaction is
/// rolled back and the run moves on to the next table.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("Schema introspection failed for '{table}': {reason}")]
    SchemaIntrospection {
        table: String,
        reason: String,
        #[source]
        source: Option<DbError>,
    },

    #[error("Failed to create destination table '{table}': {source}")]
    SchemaCreation {
        table: String,
        #[source]
        source: DbError,
    },

    #[error("Failed to read from '{table}': {source}")]
    Extraction {
        table: String,
        #[source]
        source: DbError,
    },

    #[error("Failed to insert window at offset {offset} into '{table}': {source}")]
    Insert {
        table: String,
        offset: u64,
        #[source]
        source: DbError,
    },

    #[error("Unexpected error on '{table}': {message}")]
    Unexpected {
        table: String,
        message: String,
        #[source]
        source: Option<DbError>,
    },
}

impl TableError {
    pub fn table(&self) -> &str {
        match self {
            TableError::SchemaIntrospection { table, .. }
            | TableError::SchemaCreation { table, .. }
            | TableError::Extraction { table, .. }
            | TableError::Insert { table, .. }
            | TableError::Unexpected { table, .. } => table,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            TableError::SchemaIntrospection { .. } => "schema_introspection",
            TableError::SchemaCreation { .. } => "schema_creation",
            TableError::Extraction { .. } => "extraction",
            TableError::Insert { .. } => "insert",
            TableError::Unexpected { .. } => "unexpected",
        }
    }

    fn db_error(&self) -> Option<&DbError> {
        match self {
            TableError::SchemaIntrospection { source, .. }
            | TableError::Unexpected { source, .. } => source.as_ref(),
            TableError::SchemaCreation { source, .. }
            | TableError::Extraction { source, .. }
            | TableError::Insert { source, .. } => Some(source),
        }
    }

    /// A table error caused by a dropped session cannot stay table-scoped:
    /// every later table would fail the same way.
    pub fn is_connection_lost(&self) -> bool {
        self.db_error().is_some_and(DbError::is_connection_lost)
    }
}

/// Failure that ends the whole run.
#[derive(Error, Debug)]
pub enum MigrationError {
    #[error("Cannot reach {role} endpoint: {source}")]
    Connectivity {
        role: EndpointRole,
        #[source]
        source: ConnectorError,
    },

    #[error("Failed to enumerate source tables: {0}")]
    TableEnumeration(#[source] DbError),

    #[error("Connection lost while migrating '{table}': {source}")]
    ConnectionLost {
        table: String,
        #[source]
        source: TableError,
    },

    #[error("{0}")]
    Introspection(#[source] TableError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_lost_detection() {
        let lost = TableError::Insert {
            table: "accounts".into(),
            offset: 1000,
            source: DbError::ConnectionClosed("destination".into()),
        };
        assert!(lost.is_connection_lost());
        assert_eq!(lost.table(), "accounts");
        assert_eq!(lost.kind(), "insert");

        let scoped = TableError::SchemaIntrospection {
            table: "accounts".into(),
            reason: "no columns found".into(),
            source: None,
        };
        assert!(!scoped.is_connection_lost());

        let write = TableError::Extraction {
            table: "accounts".into(),
            source: DbError::Write("boom".into()),
        };
        assert!(!write.is_connection_lost());
    }

    #[test]
    fn test_messages_name_the_table() {
        let err = TableError::Insert {
            table: "orders".into(),
            offset: 2000,
            source: DbError::Write("duplicate key".into()),
        };
        assert_eq!(
            err.to_string(),
            "Failed to insert window at offset 2000 into 'orders': Write error: duplicate key"
        );
    }
}
