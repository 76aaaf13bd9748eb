use crate::records::row::Row;

/// A bounded slice of a table's rows, fetched with offset/limit paging.
#[derive(Debug, Clone, PartialEq)]
pub struct RowWindow {
    pub offset: u64,
    pub limit: u64,
    pub rows: Vec<Row>,
}

impl RowWindow {
    pub fn new(offset: u64, limit: u64, rows: Vec<Row>) -> Self {
        RowWindow {
            offset,
            limit,
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn size_bytes(&self) -> usize {
        self.rows.iter().map(Row::size_bytes).sum()
    }
}
