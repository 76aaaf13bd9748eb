use clap::{Args, Subcommand};
use engine_config::settings::{
    ENV_BATCH_SIZE, ENV_DESTINATION_URL, ENV_INSERT_MODE, ENV_SCHEMA, ENV_SOURCE_URL,
};
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Copy every base table of the source schema to the destination (default)
    Migrate {
        #[arg(
            long,
            value_name = "PATH",
            help = "If specified, writes the run summary as JSON to this file"
        )]
        report: Option<PathBuf>,
    },
    /// Check that both endpoints accept connections
    TestConn,
    /// Print the source tables' column metadata as JSON
    Describe {
        #[arg(
            long,
            value_name = "PATH",
            help = "If specified, writes the descriptors to this file instead of stdout"
        )]
        output: Option<PathBuf>,
    },
}

/// Flags overriding the environment. Accepted before or after the
/// subcommand.
#[derive(Args, Debug, Default)]
pub struct SettingsArgs {
    #[arg(long, global = true, value_name = "URL", help = "Source connection string")]
    pub source_url: Option<String>,

    #[arg(long, global = true, value_name = "URL", help = "Destination connection string")]
    pub destination_url: Option<String>,

    #[arg(long, global = true, value_name = "ROWS", help = "Rows per window")]
    pub batch_size: Option<String>,

    #[arg(long, global = true, help = "Source schema to migrate")]
    pub schema: Option<String>,

    #[arg(
        long,
        global = true,
        value_name = "MODE",
        help = "'parameterized' or 'literal'"
    )]
    pub insert_mode: Option<String>,

    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Env file to load instead of ./.env"
    )]
    pub env_file: Option<PathBuf>,
}

impl SettingsArgs {
    /// Flag values keyed by the variable they replace.
    pub fn overrides(&self) -> Vec<(&'static str, &str)> {
        [
            (ENV_SOURCE_URL, &self.source_url),
            (ENV_DESTINATION_URL, &self.destination_url),
            (ENV_BATCH_SIZE, &self.batch_size),
            (ENV_SCHEMA, &self.schema),
            (ENV_INSERT_MODE, &self.insert_mode),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_deref().map(|v| (key, v)))
        .collect()
    }
}
