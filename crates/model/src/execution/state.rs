use crate::{execution::errors::StateError, schema::table::TableDescriptor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-table migration state.
///
/// `Pending → SchemaSynced → Extracting ⇄ Inserting → Committed`, with
/// `RolledBack` reachable from every non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MigrationState {
    Pending,
    SchemaSynced,
    Extracting,
    Inserting,
    Committed,
    RolledBack,
}

impl MigrationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            MigrationState::Pending => "PENDING",
            MigrationState::SchemaSynced => "SCHEMA_SYNCED",
            MigrationState::Extracting => "EXTRACTING",
            MigrationState::Inserting => "INSERTING",
            MigrationState::Committed => "COMMITTED",
            MigrationState::RolledBack => "ROLLED_BACK",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, MigrationState::Committed | MigrationState::RolledBack)
    }

    pub fn can_transition_to(&self, next: MigrationState) -> bool {
        use MigrationState::*;
        match (self, next) {
            (Committed | RolledBack, _) => false,
            (_, RolledBack) => true,
            (Pending, SchemaSynced) => true,
            (SchemaSynced, Extracting | Committed) => true,
            (Extracting, Inserting | Committed) => true,
            (Inserting, Extracting | Committed) => true,
            _ => false,
        }
    }
}

impl fmt::Display for MigrationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Live progress of one table. `total_rows` is sampled once and never
/// refreshed while the table is being copied.
#[derive(Debug, Clone)]
pub struct TableProgress {
    pub table: String,
    pub descriptor: Option<TableDescriptor>,
    pub total_rows: u64,
    pub migrated_rows: u64,
    pub state: MigrationState,
}

impl TableProgress {
    pub fn new(table: &str) -> Self {
        TableProgress {
            table: table.to_string(),
            descriptor: None,
            total_rows: 0,
            migrated_rows: 0,
            state: MigrationState::Pending,
        }
    }

    pub fn advance(&mut self, next: MigrationState) -> Result<(), StateError> {
        if !self.state.can_transition_to(next) {
            return Err(StateError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        Ok(())
    }

    pub fn record_window(&mut self, rows: usize) {
        self.migrated_rows += rows as u64;
    }

    /// Completion ratio in percent, clamped to 100.
    pub fn percentage(&self) -> f64 {
        if self.total_rows == 0 {
            return 100.0;
        }
        (self.migrated_rows as f64 / self.total_rows as f64 * 100.0).min(100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        let mut progress = TableProgress::new("accounts");
        progress.advance(MigrationState::SchemaSynced).unwrap();
        progress.advance(MigrationState::Extracting).unwrap();
        progress.advance(MigrationState::Inserting).unwrap();
        progress.advance(MigrationState::Extracting).unwrap();
        progress.advance(MigrationState::Inserting).unwrap();
        progress.advance(MigrationState::Committed).unwrap();
        assert!(progress.state.is_terminal());
    }

    #[test]
    fn test_empty_table_commits_from_schema_synced() {
        let mut progress = TableProgress::new("empty");
        progress.advance(MigrationState::SchemaSynced).unwrap();
        progress.advance(MigrationState::Committed).unwrap();
    }

    #[test]
    fn test_rollback_from_any_live_state() {
        for state in [
            MigrationState::Pending,
            MigrationState::SchemaSynced,
            MigrationState::Extracting,
            MigrationState::Inserting,
        ] {
            assert!(state.can_transition_to(MigrationState::RolledBack));
        }
    }

    #[test]
    fn test_terminal_states_are_final() {
        let mut progress = TableProgress::new("t");
        progress.advance(MigrationState::RolledBack).unwrap();
        let err = progress.advance(MigrationState::Committed).unwrap_err();
        assert_eq!(
            err,
            StateError::InvalidTransition {
                from: MigrationState::RolledBack,
                to: MigrationState::Committed,
            }
        );
    }

    #[test]
    fn test_cannot_skip_schema_sync() {
        let mut progress = TableProgress::new("t");
        assert!(progress.advance(MigrationState::Inserting).is_err());
        assert_eq!(progress.state, MigrationState::Pending);
    }

    #[test]
    fn test_percentage_is_clamped() {
        let mut progress = TableProgress::new("t");
        progress.total_rows = 3;
        progress.record_window(2);
        assert!((progress.percentage() - 66.666).abs() < 0.01);
        progress.record_window(2);
        assert_eq!(progress.percentage(), 100.0);
    }
}
