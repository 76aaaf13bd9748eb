use crate::error::TableError;
use connectors::sql::base::source::DataSource;
use engine_config::settings::batch_size::BatchSize;
use model::{records::window::RowWindow, schema::table::TableDescriptor};
use tracing::debug;

/// Positional reader over one source table.
#[derive(Debug, Clone, Copy)]
pub struct BatchedExtractor {
    batch_size: BatchSize,
}

impl BatchedExtractor {
    pub fn new(batch_size: BatchSize) -> Self {
        BatchedExtractor { batch_size }
    }

    /// Samples the row count. Callers keep this value for the whole table;
    /// it is never refreshed.
    pub async fn count<S>(&self, source: &mut S, table: &TableDescriptor) -> Result<u64, TableError>
    where
        S: DataSource + ?Sized,
    {
        source
            .count_rows(table)
            .await
            .map_err(|source| TableError::Extraction {
                table: table.name.clone(),
                source,
            })
    }

    pub fn windows<'a>(&self, table: &'a TableDescriptor, total_rows: u64) -> WindowCursor<'a> {
        WindowCursor::new(table, total_rows, self.batch_size.get())
    }
}

/// Yields consecutive `OFFSET`/`LIMIT` windows until a window comes back
/// empty or the offset reaches the sampled row count. Not restartable.
#[derive(Debug)]
pub struct WindowCursor<'a> {
    table: &'a TableDescriptor,
    total_rows: u64,
    limit: u64,
    offset: u64,
    drained: bool,
}

impl<'a> WindowCursor<'a> {
    pub fn new(table: &'a TableDescriptor, total_rows: u64, limit: u64) -> Self {
        WindowCursor {
            table,
            total_rows,
            limit: limit.max(1),
            offset: 0,
            drained: false,
        }
    }

    fn is_exhausted(&self) -> bool {
        self.drained || self.offset >= self.total_rows
    }

    pub async fn next_window<S>(&mut self, source: &mut S) -> Result<Option<RowWindow>, TableError>
    where
        S: DataSource + ?Sized,
    {
        if self.is_exhausted() {
            return Ok(None);
        }

        let rows = source
            .fetch_window(self.table, self.offset, self.limit)
            .await
            .map_err(|source| TableError::Extraction {
                table: self.table.name.clone(),
                source,
            })?;

        if rows.is_empty() {
            debug!(
                table = %self.table.name,
                offset = self.offset,
                total_rows = self.total_rows,
                "Source returned an empty window before the sampled row count"
            );
            self.drained = true;
            return Ok(None);
        }

        let window = RowWindow::new(self.offset, self.limit, rows);
        self.offset += self.limit;
        Ok(Some(window))
    }
}
