use crate::error::CliError;
use engine_config::settings::MigrationSettings;
use engine_core::run::check_endpoints;
use tracing::{error, info};

/// Acquires and releases both endpoints, logging each outcome.
pub async fn test_connections(settings: &MigrationSettings) -> Result<(), CliError> {
    let checks = check_endpoints(settings).await;

    let mut unreachable = Vec::new();
    for check in &checks {
        match &check.result {
            Ok(()) => info!(role = %check.role, endpoint = %check.endpoint, "Endpoint reachable"),
            Err(err) => {
                error!(role = %check.role, endpoint = %check.endpoint, error = %err, "Endpoint unreachable");
                unreachable.push(check.role.to_string());
            }
        }
    }

    if unreachable.is_empty() {
        Ok(())
    } else {
        Err(CliError::Unreachable(unreachable.join(", ")))
    }
}
