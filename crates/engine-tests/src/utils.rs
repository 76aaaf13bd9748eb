#![allow(dead_code)]

use crate::{TEST_SCHEMA, TestClient};

/// Runs `sql` against the source with the test schema on the search path.
pub async fn seed(source: &TestClient, sql: &str) {
    source
        .batch_execute(&format!("SET search_path TO {TEST_SCHEMA}; {sql}"))
        .await
        .expect("seed source");
}

pub async fn row_count(client: &TestClient, table: &str) -> i64 {
    let sql = format!("SELECT COUNT(*) FROM public.{table}");
    client
        .query_one(sql.as_str(), &[])
        .await
        .expect("count rows")
        .get(0)
}

pub async fn table_exists(client: &TestClient, table: &str) -> bool {
    client
        .query_one(
            "SELECT EXISTS (SELECT 1 FROM information_schema.tables \
             WHERE table_schema = 'public' AND table_name = $1)",
            &[&table],
        )
        .await
        .expect("check table")
        .get(0)
}

/// Column name, data type and nullability as the destination catalog
/// reports them.
pub async fn columns(client: &TestClient, table: &str) -> Vec<(String, String, String)> {
    client
        .query(
            "SELECT column_name::text, data_type::text, is_nullable::text \
             FROM information_schema.columns \
             WHERE table_schema = 'public' AND table_name = $1 \
             ORDER BY ordinal_position",
            &[&table],
        )
        .await
        .expect("read columns")
        .iter()
        .map(|r| (r.get(0), r.get(1), r.get(2)))
        .collect()
}

/// Every row of `table` rendered as text, ordered by the first column.
pub async fn text_rows(client: &TestClient, table: &str, columns: &[&str]) -> Vec<Vec<Option<String>>> {
    let select = columns
        .iter()
        .map(|c| format!("{c}::text"))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!("SELECT {select} FROM public.{table} ORDER BY 1");
    client
        .query(sql.as_str(), &[])
        .await
        .expect("read rows")
        .iter()
        .map(|r| (0..columns.len()).map(|i| r.get(i)).collect())
        .collect()
}

/// Same as `text_rows`, but reading the source copy.
pub async fn source_text_rows(
    client: &TestClient,
    table: &str,
    columns: &[&str],
) -> Vec<Vec<Option<String>>> {
    let select = columns
        .iter()
        .map(|c| format!("{c}::text"))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!("SELECT {select} FROM {TEST_SCHEMA}.{table} ORDER BY 1");
    client
        .query(sql.as_str(), &[])
        .await
        .expect("read rows")
        .iter()
        .map(|r| (0..columns.len()).map(|i| r.get(i)).collect())
        .collect()
}
