use crate::sql::base::error::DbError;
use async_trait::async_trait;
use model::{records::row::Row, schema::table::TableDescriptor};

/// Read side of a migration. Every call is issued on one session, one at a
/// time.
#[async_trait]
pub trait DataSource: Send {
    /// Base tables of `schema`, ordered by name.
    async fn list_tables(&mut self, schema: &str) -> Result<Vec<String>, DbError>;

    /// Opens the read-only snapshot one table is read under.
    async fn begin_snapshot(&mut self) -> Result<(), DbError>;

    /// Closes the snapshot opened by `begin_snapshot`. Safe to call after a
    /// failed read.
    async fn end_snapshot(&mut self) -> Result<(), DbError>;

    /// Ordered column metadata of one table. An empty column list is
    /// returned as is; deciding whether that is an error is up to the
    /// caller.
    async fn describe(&mut self, schema: &str, table: &str) -> Result<TableDescriptor, DbError>;

    async fn count_rows(&mut self, table: &TableDescriptor) -> Result<u64, DbError>;

    /// Up to `limit` rows starting at `offset`, in a stable order.
    async fn fetch_window(
        &mut self,
        table: &TableDescriptor,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Row>, DbError>;
}
