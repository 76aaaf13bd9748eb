use crate::execution::state::MigrationState;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("invalid table state transition from {from} to {to}")]
    InvalidTransition {
        from: MigrationState,
        to: MigrationState,
    },
}
