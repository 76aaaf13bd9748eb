use crate::{events::Event, report::summary::RunSummary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Events covering the lifecycle of a migration run and of each table in it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MigrationEvent {
    // === Run Lifecycle ===
    /// Emitted once the source tables have been enumerated
    RunStarted {
        tables: Vec<String>,
        timestamp: DateTime<Utc>,
    },

    /// Emitted when every table has been processed
    RunCompleted {
        summary: RunSummary,
        timestamp: DateTime<Utc>,
    },

    /// Emitted when the run stops on a run-fatal error
    RunAborted {
        error: String,
        timestamp: DateTime<Utc>,
    },

    // === Table Lifecycle ===
    TableStarted {
        table: String,
        position: usize,
        of: usize,
        timestamp: DateTime<Utc>,
    },

    /// Destination table exists with the source's columns
    SchemaSynced {
        table: String,
        columns: usize,
        timestamp: DateTime<Utc>,
    },

    RowsCounted {
        table: String,
        total_rows: u64,
        timestamp: DateTime<Utc>,
    },

    /// The source table holds no rows; nothing is inserted
    NoData {
        table: String,
        timestamp: DateTime<Utc>,
    },

    WindowInserted {
        table: String,
        offset: u64,
        rows: usize,
        migrated_rows: u64,
        total_rows: u64,
        percentage: f64,
        timestamp: DateTime<Utc>,
    },

    TableCommitted {
        table: String,
        rows: u64,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    },

    TableRolledBack {
        table: String,
        error: String,
        timestamp: DateTime<Utc>,
    },
}

impl fmt::Display for MigrationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationEvent::RunStarted { tables, .. } => {
                write!(f, "Run started with {} tables", tables.len())
            }
            MigrationEvent::RunCompleted { summary, .. } => write!(
                f,
                "Run completed: {} committed, {} rolled back",
                summary.committed(),
                summary.rolled_back()
            ),
            MigrationEvent::RunAborted { error, .. } => write!(f, "Run aborted: {error}"),
            MigrationEvent::TableStarted {
                table, position, of, ..
            } => write!(f, "Migrating table {position} of {of}: {table}"),
            MigrationEvent::SchemaSynced { table, columns, .. } => {
                write!(f, "Schema synced for {table} ({columns} columns)")
            }
            MigrationEvent::RowsCounted {
                table, total_rows, ..
            } => write!(f, "Found {total_rows} rows in {table}"),
            MigrationEvent::NoData { table, .. } => write!(f, "No data found in table {table}"),
            MigrationEvent::WindowInserted {
                table,
                migrated_rows,
                total_rows,
                percentage,
                ..
            } => write!(
                f,
                "{table}: {percentage:.1}% ({migrated_rows}/{total_rows} rows)"
            ),
            MigrationEvent::TableCommitted {
                table,
                rows,
                duration_ms,
                ..
            } => write!(f, "Table {table} committed: {rows} rows in {duration_ms}ms"),
            MigrationEvent::TableRolledBack { table, error, .. } => {
                write!(f, "Table {table} rolled back: {error}")
            }
        }
    }
}

impl MigrationEvent {
    /// Returns the event type as a string
    pub fn event_type(&self) -> &'static str {
        match self {
            MigrationEvent::RunStarted { .. } => "run_started",
            MigrationEvent::RunCompleted { .. } => "run_completed",
            MigrationEvent::RunAborted { .. } => "run_aborted",
            MigrationEvent::TableStarted { .. } => "table_started",
            MigrationEvent::SchemaSynced { .. } => "schema_synced",
            MigrationEvent::RowsCounted { .. } => "rows_counted",
            MigrationEvent::NoData { .. } => "no_data",
            MigrationEvent::WindowInserted { .. } => "window_inserted",
            MigrationEvent::TableCommitted { .. } => "table_committed",
            MigrationEvent::TableRolledBack { .. } => "table_rolled_back",
        }
    }

    /// Table the event refers to, `None` for run-level events
    pub fn table(&self) -> Option<&str> {
        match self {
            MigrationEvent::TableStarted { table, .. }
            | MigrationEvent::SchemaSynced { table, .. }
            | MigrationEvent::RowsCounted { table, .. }
            | MigrationEvent::NoData { table, .. }
            | MigrationEvent::WindowInserted { table, .. }
            | MigrationEvent::TableCommitted { table, .. }
            | MigrationEvent::TableRolledBack { table, .. } => Some(table),
            MigrationEvent::RunStarted { .. }
            | MigrationEvent::RunCompleted { .. }
            | MigrationEvent::RunAborted { .. } => None,
        }
    }

    pub fn timestamp(&self) -> &DateTime<Utc> {
        match self {
            MigrationEvent::RunStarted { timestamp, .. }
            | MigrationEvent::RunCompleted { timestamp, .. }
            | MigrationEvent::RunAborted { timestamp, .. }
            | MigrationEvent::TableStarted { timestamp, .. }
            | MigrationEvent::SchemaSynced { timestamp, .. }
            | MigrationEvent::RowsCounted { timestamp, .. }
            | MigrationEvent::NoData { timestamp, .. }
            | MigrationEvent::WindowInserted { timestamp, .. }
            | MigrationEvent::TableCommitted { timestamp, .. }
            | MigrationEvent::TableRolledBack { timestamp, .. } => timestamp,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            MigrationEvent::RunAborted { .. } | MigrationEvent::TableRolledBack { .. }
        )
    }
}

impl Event for MigrationEvent {
    fn event_type(&self) -> &'static str {
        MigrationEvent::event_type(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization() {
        let event = MigrationEvent::NoData {
            table: "accounts".to_string(),
            timestamp: Utc::now(),
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "no_data");
        assert_eq!(json["table"], "accounts");

        let back: MigrationEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back.event_type(), "no_data");
    }

    #[test]
    fn test_event_display() {
        let event = MigrationEvent::WindowInserted {
            table: "accounts".to_string(),
            offset: 0,
            rows: 1,
            migrated_rows: 1,
            total_rows: 3,
            percentage: 33.333,
            timestamp: Utc::now(),
        };
        assert_eq!(event.to_string(), "accounts: 33.3% (1/3 rows)");
    }

    #[test]
    fn test_event_helpers() {
        let failed = MigrationEvent::TableRolledBack {
            table: "t".to_string(),
            error: "boom".to_string(),
            timestamp: Utc::now(),
        };
        assert!(failed.is_error());
        assert_eq!(failed.table(), Some("t"));

        let started = MigrationEvent::RunStarted {
            tables: vec![],
            timestamp: Utc::now(),
        };
        assert!(!started.is_error());
        assert_eq!(started.table(), None);
    }
}
