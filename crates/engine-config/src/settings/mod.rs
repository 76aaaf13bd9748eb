use crate::settings::{batch_size::BatchSize, error::SettingsError};
use connectors::sql::{base::query::generator::IdentStyle, postgres::utils::validate_conn_str};
use model::execution::connection::Endpoint;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt, str::FromStr};
use tracing::debug;

pub mod batch_size;
pub mod error;

pub const ENV_SOURCE_URL: &str = "DBSHIFT_SOURCE_URL";
pub const ENV_DESTINATION_URL: &str = "DBSHIFT_DESTINATION_URL";
pub const ENV_BATCH_SIZE: &str = "DBSHIFT_BATCH_SIZE";
pub const ENV_SCHEMA: &str = "DBSHIFT_SCHEMA";
pub const ENV_INSERT_MODE: &str = "DBSHIFT_INSERT_MODE";

pub const DEFAULT_SOURCE_URL: &str = "postgresql://postgres@localhost:5432/postgres";
pub const DEFAULT_SCHEMA: &str = "public";

/// How rows are written to the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertMode {
    /// Values bound as parameters, identifiers quoted.
    #[default]
    Parameterized,
    /// Values inlined as SQL literals and identifiers left bare, producing
    /// the exact statements earlier versions of the tool sent.
    Literal,
}

impl InsertMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsertMode::Parameterized => "parameterized",
            InsertMode::Literal => "literal",
        }
    }

    /// Identifier style used for every destination statement in this mode.
    pub fn ident_style(&self) -> IdentStyle {
        match self {
            InsertMode::Parameterized => IdentStyle::Quoted,
            InsertMode::Literal => IdentStyle::Bare,
        }
    }
}

impl FromStr for InsertMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "parameterized" | "params" => Ok(InsertMode::Parameterized),
            "literal" => Ok(InsertMode::Literal),
            other => Err(format!(
                "unknown insert mode '{other}', expected 'parameterized' or 'literal'"
            )),
        }
    }
}

impl fmt::Display for InsertMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a run needs to know, fixed before the run starts.
#[derive(Debug, Clone)]
pub struct MigrationSettings {
    pub source: Endpoint,
    pub destination: Endpoint,
    pub batch_size: BatchSize,
    /// Source namespace whose base tables are migrated.
    pub schema: String,
    pub insert_mode: InsertMode,
}

impl MigrationSettings {
    pub fn new(source: Endpoint, destination: Endpoint) -> Self {
        MigrationSettings {
            source,
            destination,
            batch_size: BatchSize::default(),
            schema: DEFAULT_SCHEMA.to_string(),
            insert_mode: InsertMode::default(),
        }
    }

    /// Builds settings from a variable map (process environment merged with
    /// a `.env` file and command-line overrides), applying defaults for
    /// anything absent, then validates them.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, SettingsError> {
        let lookup = |key: &str| {
            vars.get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
        };

        let source = lookup(ENV_SOURCE_URL).unwrap_or(DEFAULT_SOURCE_URL);
        let destination = lookup(ENV_DESTINATION_URL).ok_or(SettingsError::Missing(ENV_DESTINATION_URL))?;

        let mut settings = Self::new(Endpoint::source(source), Endpoint::destination(destination));

        if let Some(raw) = lookup(ENV_BATCH_SIZE) {
            settings.batch_size = BatchSize::parse(ENV_BATCH_SIZE, raw)?;
        }
        if let Some(schema) = lookup(ENV_SCHEMA) {
            settings.schema = schema.to_string();
        }
        if let Some(raw) = lookup(ENV_INSERT_MODE) {
            settings.insert_mode = raw.parse().map_err(|reason| SettingsError::Invalid {
                key: ENV_INSERT_MODE,
                reason,
            })?;
        }

        settings.validate()?;
        debug!(
            source = %settings.source,
            destination = %settings.destination,
            batch_size = %settings.batch_size,
            schema = %settings.schema,
            insert_mode = %settings.insert_mode,
            "Loaded migration settings"
        );
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        validate_conn_str(&self.source.conn_str).map_err(|source| {
            SettingsError::InvalidEndpoint {
                role: "source",
                source,
            }
        })?;
        validate_conn_str(&self.destination.conn_str).map_err(|source| {
            SettingsError::InvalidEndpoint {
                role: "destination",
                source,
            }
        })?;

        if self.source.conn_str.trim() == self.destination.conn_str.trim() {
            return Err(SettingsError::SameEndpoint);
        }
        if self.schema.trim().is_empty() {
            return Err(SettingsError::Invalid {
                key: ENV_SCHEMA,
                reason: "schema must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
