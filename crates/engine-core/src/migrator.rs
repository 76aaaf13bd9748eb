use crate::{
    error::{MigrationError, TableError},
    extract::BatchedExtractor,
    insert::BatchInserter,
    metrics::Metrics,
    progress::ProgressReporter,
    schema::{create::TableCreator, introspect::SchemaIntrospector},
};
use chrono::Utc;
use connectors::sql::base::{destination::DataDestination, source::DataSource};
use engine_config::settings::MigrationSettings;
use model::{
    events::migration::MigrationEvent,
    execution::state::{MigrationState, TableProgress},
    report::summary::{RunSummary, TableReport},
};
use std::time::Instant;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

/// Copies every base table of the configured schema, one table and one
/// window at a time. Each table gets its own source snapshot and its own
/// destination transaction; a failing table is rolled back and the run
/// continues with the next one.
pub struct Migrator<S, D> {
    source: S,
    destination: D,
    introspector: SchemaIntrospector,
    creator: TableCreator,
    extractor: BatchedExtractor,
    inserter: BatchInserter,
    reporter: ProgressReporter,
    metrics: Metrics,
    last_summary: Option<RunSummary>,
}

impl<S, D> Migrator<S, D>
where
    S: DataSource,
    D: DataDestination,
{
    pub fn new(source: S, destination: D, settings: &MigrationSettings) -> Self {
        Migrator {
            source,
            destination,
            introspector: SchemaIntrospector::new(&settings.schema),
            creator: TableCreator::new(settings.insert_mode.ident_style()),
            extractor: BatchedExtractor::new(settings.batch_size),
            inserter: BatchInserter::new(settings.insert_mode),
            reporter: ProgressReporter::new(),
            metrics: Metrics::new(),
            last_summary: None,
        }
    }

    pub fn with_events(mut self, events: UnboundedSender<MigrationEvent>) -> Self {
        self.reporter = ProgressReporter::with_events(events);
        self
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Summary of the latest run, including one that was aborted.
    pub fn last_summary(&self) -> Option<&RunSummary> {
        self.last_summary.as_ref()
    }

    pub fn into_parts(self) -> (S, D) {
        (self.source, self.destination)
    }

    pub async fn run(&mut self) -> Result<RunSummary, MigrationError> {
        let mut summary = RunSummary::new(Utc::now());

        let tables = match self.introspector.list_tables(&mut self.source).await {
            Ok(tables) => tables,
            Err(err) => return Err(self.abort(summary, MigrationError::TableEnumeration(err))),
        };
        self.reporter.run_started(self.introspector.schema(), &tables);

        let of = tables.len();
        for (i, table) in tables.iter().enumerate() {
            self.reporter.table_started(table, i + 1, of);

            let started = Instant::now();
            let mut progress = TableProgress::new(table);
            let outcome = self.migrate_table(&mut progress).await;
            let elapsed_ms = started.elapsed().as_millis() as u64;

            match outcome {
                Ok(rows) => {
                    self.reporter.table_committed(table, rows, elapsed_ms);
                    summary.record(table_report(&progress, elapsed_ms, None));
                }
                Err(err) => {
                    if let Err(state_err) = progress.advance(MigrationState::RolledBack) {
                        warn!(table = %table, error = %state_err, "Unexpected table state after failure");
                    }
                    self.metrics.increment_failures(1);
                    self.reporter.table_rolled_back(&err);
                    summary.record(table_report(&progress, elapsed_ms, Some(err.to_string())));

                    if err.is_connection_lost() {
                        let fatal = MigrationError::ConnectionLost {
                            table: table.clone(),
                            source: err,
                        };
                        return Err(self.abort(summary, fatal));
                    }
                }
            }
        }

        summary.finish(Utc::now());
        let metrics = self.metrics.snapshot();
        info!(
            windows = metrics.windows_processed,
            bytes = metrics.bytes_transferred,
            "Run totals"
        );
        self.reporter.run_completed(&summary);
        self.last_summary = Some(summary.clone());
        Ok(summary)
    }

    fn abort(&mut self, mut summary: RunSummary, err: MigrationError) -> MigrationError {
        summary.aborted = Some(err.to_string());
        summary.finish(Utc::now());
        self.reporter.run_aborted(&err, &summary);
        self.last_summary = Some(summary);
        err
    }

    /// One table inside its source snapshot. Any failure rolls back the
    /// destination transaction before it is returned.
    async fn migrate_table(&mut self, progress: &mut TableProgress) -> Result<u64, TableError> {
        let table = progress.table.clone();

        self.source
            .begin_snapshot()
            .await
            .map_err(|source| TableError::Extraction {
                table: table.clone(),
                source,
            })?;

        let result = match self.destination.begin().await {
            Ok(()) => {
                let copied = self.copy_table(progress).await;
                if copied.is_err()
                    && let Err(err) = self.destination.rollback().await
                {
                    warn!(table = %table, error = %err, "Rollback failed");
                }
                copied
            }
            Err(err) => Err(TableError::Unexpected {
                table: table.clone(),
                message: format!("failed to open destination transaction: {err}"),
                source: Some(err),
            }),
        };

        if let Err(err) = self.source.end_snapshot().await {
            warn!(table = %table, error = %err, "Failed to close source snapshot");
        }
        result
    }

    async fn copy_table(&mut self, progress: &mut TableProgress) -> Result<u64, TableError> {
        let table = progress.table.clone();

        let descriptor = self.introspector.describe(&mut self.source, &table).await?;
        self.creator
            .ensure_exists(&mut self.destination, &descriptor)
            .await?;
        transition(progress, MigrationState::SchemaSynced)?;
        progress.descriptor = Some(descriptor.clone());
        self.reporter
            .schema_synced(&table, descriptor.column_count());

        let total_rows = self.extractor.count(&mut self.source, &descriptor).await?;
        progress.total_rows = total_rows;
        self.reporter.rows_counted(&table, total_rows);

        if total_rows == 0 {
            self.commit(&table).await?;
            transition(progress, MigrationState::Committed)?;
            self.reporter.no_data(&table);
            return Ok(0);
        }

        let mut cursor = self.extractor.windows(&descriptor, total_rows);
        loop {
            transition(progress, MigrationState::Extracting)?;
            let Some(window) = cursor.next_window(&mut self.source).await? else {
                break;
            };

            transition(progress, MigrationState::Inserting)?;
            self.inserter
                .insert(&mut self.destination, &descriptor, &window)
                .await?;

            progress.record_window(window.len());
            self.metrics.increment_rows(window.len() as u64);
            self.metrics.increment_windows(1);
            self.metrics.increment_bytes(window.size_bytes() as u64);
            self.reporter.window_inserted(progress, &window);
        }

        self.commit(&table).await?;
        transition(progress, MigrationState::Committed)?;

        if progress.migrated_rows != total_rows {
            warn!(
                table = %table,
                migrated_rows = progress.migrated_rows,
                total_rows,
                "Row count changed while the table was read"
            );
        }
        Ok(progress.migrated_rows)
    }

    async fn commit(&mut self, table: &str) -> Result<(), TableError> {
        self.destination
            .commit()
            .await
            .map_err(|err| TableError::Unexpected {
                table: table.to_string(),
                message: format!("commit failed: {err}"),
                source: Some(err),
            })
    }
}

fn transition(progress: &mut TableProgress, next: MigrationState) -> Result<(), TableError> {
    progress
        .advance(next)
        .map_err(|err| TableError::Unexpected {
            table: progress.table.clone(),
            message: err.to_string(),
            source: None,
        })
}

fn table_report(progress: &TableProgress, elapsed_ms: u64, error: Option<String>) -> TableReport {
    TableReport {
        table: progress.table.clone(),
        state: progress.state,
        total_rows: progress.total_rows,
        migrated_rows: progress.migrated_rows,
        elapsed_ms,
        error,
    }
}
