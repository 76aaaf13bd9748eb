use std::error::Error as _;
use thiserror::Error;

/// Renders a driver error with what the server reported. The driver's own
/// `Display` stops at "db error"; severity, SQLSTATE, message, detail and
/// hint live on the inner `DbError`.
pub fn describe_pg_error(err: &tokio_postgres::Error) -> String {
    if let Some(db) = err.as_db_error() {
        let mut text = format!("{} {}: {}", db.severity(), db.code().code(), db.message());
        if let Some(detail) = db.detail() {
            text.push_str(&format!(" (detail: {detail})"));
        }
        if let Some(hint) = db.hint() {
            text.push_str(&format!(" (hint: {hint})"));
        }
        return text;
    }

    match err.source() {
        Some(cause) => format!("{err}: {cause}"),
        None => err.to_string(),
    }
}

/// All errors coming from the database/query layer.
#[derive(Debug, Error)]
pub enum DbError {
    /// Any PostgreSQL driver error.
    #[error("PostgreSQL error: {}", describe_pg_error(.0))]
    Postgres(#[from] tokio_postgres::Error),

    /// A source value could not be read into the column's value kind.
    #[error("Failed to decode column '{column}' ({declared_type}): {message}")]
    Decode {
        column: String,
        declared_type: String,
        message: String,
    },

    /// The destination accepted the statement but wrote a different number
    /// of rows than were sent.
    #[error("Expected {expected} rows written to '{table}', destination reported {actual}")]
    RowCountMismatch {
        table: String,
        expected: usize,
        actual: u64,
    },

    /// The session ended before the statement could be sent.
    #[error("Connection to {0} is closed")]
    ConnectionClosed(String),

    /// Writing rows to the database failed at the application level.
    #[error("Write error: {0}")]
    Write(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl DbError {
    /// True when the underlying session is gone and nothing else can run
    /// on it.
    pub fn is_connection_lost(&self) -> bool {
        match self {
            DbError::Postgres(err) => err.is_closed(),
            DbError::ConnectionClosed(_) => true,
            _ => false,
        }
    }
}

/// Errors happening during connection setup.
#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("Invalid connection string: {0}")]
    InvalidUrl(String),

    #[error("TLS setup failed: {0}")]
    Tls(#[from] native_tls::Error),

    #[error("PostgreSQL connection failed: {}", describe_pg_error(.0))]
    Postgres(#[from] tokio_postgres::Error),

    #[error("Ping failed: {0}")]
    Ping(String),
}
