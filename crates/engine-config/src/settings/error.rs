use connectors::sql::base::error::ConnectorError;
use thiserror::Error;

/// Errors raised when reading or validating migration settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A setting with no default was not provided.
    #[error("Missing required setting {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    /// The connection string of an endpoint does not parse.
    #[error("Invalid {role} connection string: {source}")]
    InvalidEndpoint {
        role: &'static str,
        #[source]
        source: ConnectorError,
    },

    #[error("Source and destination point at the same database")]
    SameEndpoint,
}
