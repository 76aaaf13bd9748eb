use engine_config::settings::error::SettingsError;
use engine_core::error::MigrationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to load environment: {0}")]
    Config(String),

    #[error("Invalid configuration: {0}")]
    Settings(#[from] SettingsError),

    #[error("Migration failed: {0}")]
    Migration(#[from] MigrationError),

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    #[error("Unreachable endpoints: {0}")]
    Unreachable(String),
}
