use crate::{commands::SettingsArgs, env::EnvManager, error::CliError, exit::ExitCode};
use clap::Parser;
use commands::Commands;
use engine_config::settings::MigrationSettings;
use engine_core::run::{describe_source, execute};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod commands;
mod conn;
mod env;
mod error;
mod exit;
mod output;

const LOG_ENV: &str = "DBSHIFT_LOG";

#[derive(Parser)]
#[command(
    name = "dbshift",
    version,
    about = "Copies the tables of a PostgreSQL schema into another PostgreSQL database"
)]
struct Cli {
    #[command(flatten)]
    settings: SettingsArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> std::process::ExitCode {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    let code = match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            error!(error = %err, "dbshift failed");
            ExitCode::GeneralError
        }
    };
    code.into()
}

async fn run(cli: Cli) -> Result<ExitCode, CliError> {
    let settings = load_settings(&cli.settings)?;

    match cli.command.unwrap_or(Commands::Migrate { report: None }) {
        Commands::Migrate { report } => {
            let summary = execute(&settings, None).await?;
            if let Some(path) = report {
                output::write_report(&summary, &path).await?;
            }

            if summary.is_success() {
                Ok(ExitCode::Success)
            } else {
                Ok(ExitCode::TablesFailed)
            }
        }
        Commands::TestConn => {
            conn::test_connections(&settings).await?;
            info!("Both endpoints are reachable");
            Ok(ExitCode::Success)
        }
        Commands::Describe { output } => {
            let descriptors = describe_source(&settings).await?;
            output::emit_descriptors(&descriptors, output.as_deref()).await?;
            Ok(ExitCode::Success)
        }
    }
}

fn load_settings(args: &SettingsArgs) -> Result<MigrationSettings, CliError> {
    let mut env = EnvManager::new();
    match &args.env_file {
        Some(path) => env.load_from_file(path)?,
        None => env.load_default_file()?,
    };

    for (key, value) in args.overrides() {
        env.set(key, value);
    }

    Ok(MigrationSettings::from_vars(env.all())?)
}
