use crate::{
    error::MigrationError, migrator::Migrator, progress::ProgressReporter,
    schema::introspect::SchemaIntrospector,
};
use chrono::Utc;
use connectors::sql::{base::source::DataSource, postgres::adapter::PgConnection};
use engine_config::settings::MigrationSettings;
use model::{
    events::migration::MigrationEvent,
    execution::connection::{Endpoint, EndpointRole},
    report::summary::RunSummary,
    schema::table::TableDescriptor,
};
use tokio::sync::mpsc::UnboundedSender;
use tracing::info;

async fn acquire(endpoint: &Endpoint) -> Result<PgConnection, MigrationError> {
    PgConnection::acquire(endpoint)
        .await
        .map_err(|source| MigrationError::Connectivity {
            role: endpoint.role,
            source,
        })
}

/// Connects both endpoints, migrates every table and releases both
/// connections whatever the outcome.
pub async fn execute(
    settings: &MigrationSettings,
    events: Option<UnboundedSender<MigrationEvent>>,
) -> Result<RunSummary, MigrationError> {
    info!(
        source = %settings.source,
        destination = %settings.destination,
        batch_size = %settings.batch_size,
        insert_mode = %settings.insert_mode,
        "Preparing migration"
    );

    let reporter = match &events {
        Some(events) => ProgressReporter::with_events(events.clone()),
        None => ProgressReporter::new(),
    };

    let source = match acquire(&settings.source).await {
        Ok(conn) => conn,
        Err(err) => return Err(abort_before_start(&reporter, err)),
    };
    let destination = match acquire(&settings.destination).await {
        Ok(conn) => conn,
        Err(err) => {
            source.close().await;
            return Err(abort_before_start(&reporter, err));
        }
    };

    let mut migrator = Migrator::new(source, destination, settings);
    if let Some(events) = events {
        migrator = migrator.with_events(events);
    }

    let result = migrator.run().await;

    let (source, destination) = migrator.into_parts();
    source.close().await;
    destination.close().await;
    result
}

/// Reports a run that ended before any table was attempted: an empty
/// summary carrying the reason.
fn abort_before_start(reporter: &ProgressReporter, err: MigrationError) -> MigrationError {
    let mut summary = RunSummary::new(Utc::now());
    summary.aborted = Some(err.to_string());
    summary.finish(Utc::now());
    reporter.run_aborted(&err, &summary);
    err
}

/// Descriptors of every base table in the source schema, without touching
/// the destination.
pub async fn describe_source(settings: &MigrationSettings) -> Result<Vec<TableDescriptor>, MigrationError> {
    let mut source = acquire(&settings.source).await?;
    let result = describe_all(&mut source, &settings.schema).await;
    source.close().await;
    result
}

async fn describe_all<S>(source: &mut S, schema: &str) -> Result<Vec<TableDescriptor>, MigrationError>
where
    S: DataSource + ?Sized,
{
    let introspector = SchemaIntrospector::new(schema);
    let tables = introspector
        .list_tables(&mut *source)
        .await
        .map_err(MigrationError::TableEnumeration)?;

    let mut descriptors = Vec::with_capacity(tables.len());
    for table in &tables {
        let descriptor = introspector
            .describe(&mut *source, table)
            .await
            .map_err(MigrationError::Introspection)?;
        descriptors.push(descriptor);
    }
    Ok(descriptors)
}

/// Whether an endpoint answered the connection round-trip.
#[derive(Debug)]
pub struct EndpointCheck {
    pub role: EndpointRole,
    pub endpoint: String,
    pub result: Result<(), MigrationError>,
}

/// Connects to each endpoint in turn and closes it again.
pub async fn check_endpoints(settings: &MigrationSettings) -> Vec<EndpointCheck> {
    let mut checks = Vec::with_capacity(2);
    for endpoint in [&settings.source, &settings.destination] {
        let result = match acquire(endpoint).await {
            Ok(conn) => {
                conn.close().await;
                Ok(())
            }
            Err(err) => Err(err),
        };
        checks.push(EndpointCheck {
            role: endpoint.role,
            endpoint: endpoint.redacted(),
            result,
        });
    }
    checks
}
