use crate::execution::state::MigrationState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Final outcome of one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableReport {
    pub table: String,
    pub state: MigrationState,
    pub total_rows: u64,
    pub migrated_rows: u64,
    pub elapsed_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TableReport {
    pub fn is_committed(&self) -> bool {
        self.state == MigrationState::Committed
    }
}

/// What a run leaves behind besides the destination data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    pub tables: Vec<TableReport>,
    /// Set when the run stopped on a run-fatal error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aborted: Option<String>,
}

impl RunSummary {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        RunSummary {
            started_at,
            finished_at: started_at,
            elapsed_ms: 0,
            tables: Vec::new(),
            aborted: None,
        }
    }

    pub fn record(&mut self, report: TableReport) {
        self.tables.push(report);
    }

    pub fn finish(&mut self, finished_at: DateTime<Utc>) {
        self.finished_at = finished_at;
        self.elapsed_ms = (finished_at - self.started_at)
            .num_milliseconds()
            .max(0) as u64;
    }

    pub fn committed(&self) -> usize {
        self.tables.iter().filter(|t| t.is_committed()).count()
    }

    pub fn rolled_back(&self) -> usize {
        self.tables
            .iter()
            .filter(|t| t.state == MigrationState::RolledBack)
            .count()
    }

    pub fn rows_migrated(&self) -> u64 {
        self.tables
            .iter()
            .filter(|t| t.is_committed())
            .map(|t| t.migrated_rows)
            .sum()
    }

    pub fn table(&self, name: &str) -> Option<&TableReport> {
        self.tables.iter().find(|t| t.table == name)
    }

    /// True when the run finished and every table was committed.
    pub fn is_success(&self) -> bool {
        self.aborted.is_none() && self.rolled_back() == 0
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} tables committed, {} rolled back, {} rows migrated in {:.2}s",
            self.committed(),
            self.rolled_back(),
            self.rows_migrated(),
            self.elapsed_ms as f64 / 1000.0
        )?;
        for table in &self.tables {
            match &table.error {
                Some(error) => writeln!(f, "  {:<12} {} ({error})", table.state, table.table)?,
                None => writeln!(
                    f,
                    "  {:<12} {} ({} rows)",
                    table.state, table.table, table.migrated_rows
                )?,
            }
        }
        if let Some(reason) = &self.aborted {
            writeln!(f, "  run aborted: {reason}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn report(table: &str, state: MigrationState, rows: u64) -> TableReport {
        TableReport {
            table: table.to_string(),
            state,
            total_rows: rows,
            migrated_rows: rows,
            elapsed_ms: 5,
            error: (state == MigrationState::RolledBack).then(|| "failed".to_string()),
        }
    }

    #[test]
    fn test_counts() {
        let start = Utc::now();
        let mut summary = RunSummary::new(start);
        summary.record(report("a", MigrationState::Committed, 10));
        summary.record(report("b", MigrationState::RolledBack, 4));
        summary.record(report("c", MigrationState::Committed, 0));
        summary.finish(start + Duration::milliseconds(1500));

        assert_eq!(summary.committed(), 2);
        assert_eq!(summary.rolled_back(), 1);
        assert_eq!(summary.rows_migrated(), 10);
        assert_eq!(summary.elapsed_ms, 1500);
        assert!(!summary.is_success());
        assert!(summary.to_string().starts_with("2 tables committed, 1 rolled back"));
    }

    #[test]
    fn test_json_shape() {
        let mut summary = RunSummary::new(Utc::now());
        summary.record(report("a", MigrationState::Committed, 1));
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["tables"][0]["state"], "COMMITTED");
        assert!(json.get("aborted").is_none());
        assert!(json["tables"][0].get("error").is_none());
    }
}
