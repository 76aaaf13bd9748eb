use crate::sql::base::{error::DbError, query::statement::Statement};
use async_trait::async_trait;

/// Write side of a migration. The caller owns the transaction boundaries;
/// `execute` only ever runs inside a transaction opened with `begin`.
#[async_trait]
pub trait DataDestination: Send {
    async fn begin(&mut self) -> Result<(), DbError>;
    async fn commit(&mut self) -> Result<(), DbError>;
    async fn rollback(&mut self) -> Result<(), DbError>;

    /// Runs one statement and returns the number of rows it affected.
    async fn execute(&mut self, statement: &Statement) -> Result<u64, DbError>;
}
