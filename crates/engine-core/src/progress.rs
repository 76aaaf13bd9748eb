use crate::error::{MigrationError, TableError};
use chrono::Utc;
use model::{
    events::migration::MigrationEvent, execution::state::TableProgress, records::window::RowWindow,
    report::summary::RunSummary,
};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error, info, warn};

/// Reports run and table progress as log lines and, when a listener is
/// attached, as `MigrationEvent`s.
#[derive(Debug, Clone, Default)]
pub struct ProgressReporter {
    events: Option<UnboundedSender<MigrationEvent>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(events: UnboundedSender<MigrationEvent>) -> Self {
        ProgressReporter {
            events: Some(events),
        }
    }

    fn emit(&self, event: MigrationEvent) {
        if let Some(tx) = &self.events
            && tx.send(event).is_err()
        {
            debug!("Event listener dropped; event discarded");
        }
    }

    pub fn run_started(&self, schema: &str, tables: &[String]) {
        info!(schema, tables = tables.len(), "Starting migration");
        self.emit(MigrationEvent::RunStarted {
            tables: tables.to_vec(),
            timestamp: Utc::now(),
        });
    }

    pub fn table_started(&self, table: &str, position: usize, of: usize) {
        info!(table, position, of, "Migrating table");
        self.emit(MigrationEvent::TableStarted {
            table: table.to_string(),
            position,
            of,
            timestamp: Utc::now(),
        });
    }

    pub fn schema_synced(&self, table: &str, columns: usize) {
        info!(table, columns, "Destination table ready");
        self.emit(MigrationEvent::SchemaSynced {
            table: table.to_string(),
            columns,
            timestamp: Utc::now(),
        });
    }

    pub fn rows_counted(&self, table: &str, total_rows: u64) {
        info!(table, total_rows, "Counted source rows");
        self.emit(MigrationEvent::RowsCounted {
            table: table.to_string(),
            total_rows,
            timestamp: Utc::now(),
        });
    }

    pub fn no_data(&self, table: &str) {
        info!(table, "No data found in table");
        self.emit(MigrationEvent::NoData {
            table: table.to_string(),
            timestamp: Utc::now(),
        });
    }

    pub fn window_inserted(&self, progress: &TableProgress, window: &RowWindow) {
        let percentage = progress.percentage();
        info!(
            table = %progress.table,
            offset = window.offset,
            rows = window.len(),
            migrated_rows = progress.migrated_rows,
            total_rows = progress.total_rows,
            "Progress: {percentage:.1}%"
        );
        self.emit(MigrationEvent::WindowInserted {
            table: progress.table.clone(),
            offset: window.offset,
            rows: window.len(),
            migrated_rows: progress.migrated_rows,
            total_rows: progress.total_rows,
            percentage,
            timestamp: Utc::now(),
        });
    }

    pub fn table_committed(&self, table: &str, rows: u64, duration_ms: u64) {
        info!(
            table,
            rows,
            duration_ms,
            "Completed table in {:.2}s",
            duration_ms as f64 / 1000.0
        );
        self.emit(MigrationEvent::TableCommitted {
            table: table.to_string(),
            rows,
            duration_ms,
            timestamp: Utc::now(),
        });
    }

    pub fn table_rolled_back(&self, err: &TableError) {
        error!(table = err.table(), kind = err.kind(), error = %err, "Table rolled back");
        self.emit(MigrationEvent::TableRolledBack {
            table: err.table().to_string(),
            error: err.to_string(),
            timestamp: Utc::now(),
        });
    }

    pub fn run_completed(&self, summary: &RunSummary) {
        if summary.is_success() {
            info!("Migration finished: {summary}");
        } else {
            warn!("Migration finished with failures: {summary}");
        }
        self.emit(MigrationEvent::RunCompleted {
            summary: summary.clone(),
            timestamp: Utc::now(),
        });
    }

    pub fn run_aborted(&self, err: &MigrationError, summary: &RunSummary) {
        error!(error = %err, "Migration aborted: {summary}");
        self.emit(MigrationEvent::RunAborted {
            error: err.to_string(),
            timestamp: Utc::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::{core::value::Value, records::row::Row};
    use tokio::sync::mpsc;

    #[test]
    fn test_events_are_forwarded() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let reporter = ProgressReporter::with_events(tx);

        let mut progress = TableProgress::new("accounts");
        progress.total_rows = 4;
        progress.record_window(3);
        let window = RowWindow::new(0, 3, vec![Row::new(vec![Value::Int(1)]); 3]);

        reporter.no_data("empty");
        reporter.window_inserted(&progress, &window);

        match rx.try_recv().unwrap() {
            MigrationEvent::NoData { table, .. } => assert_eq!(table, "empty"),
            other => panic!("unexpected event {other:?}"),
        }
        match rx.try_recv().unwrap() {
            MigrationEvent::WindowInserted {
                rows,
                migrated_rows,
                percentage,
                ..
            } => {
                assert_eq!(rows, 3);
                assert_eq!(migrated_rows, 3);
                assert_eq!(percentage, 75.0);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_dropped_listener_is_ignored() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let reporter = ProgressReporter::with_events(tx);
        reporter.no_data("accounts");
    }
}
