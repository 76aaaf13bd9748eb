use crate::error::CliError;
use model::{report::summary::RunSummary, schema::table::TableDescriptor};
use serde::Serialize;
use std::path::Path;
use tracing::info;

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub async fn write_report(summary: &RunSummary, path: &Path) -> Result<(), CliError> {
    tokio::fs::write(path, to_json(summary)?).await?;
    info!(path = %path.display(), "Wrote run report");
    Ok(())
}

pub async fn emit_descriptors(
    descriptors: &[TableDescriptor],
    path: Option<&Path>,
) -> Result<(), CliError> {
    let json = to_json(descriptors)?;
    match path {
        Some(path) => {
            tokio::fs::write(path, json).await?;
            info!(path = %path.display(), tables = descriptors.len(), "Wrote table descriptors");
        }
        None => println!("{json}"),
    }
    Ok(())
}
