#![allow(dead_code)]

use connectors::sql::postgres::utils::connect_client;
use engine_config::settings::{InsertMode, MigrationSettings, batch_size::BatchSize};
use model::execution::connection::Endpoint;
use std::env;
use tokio::{sync::Mutex, task::JoinHandle};
use tokio_postgres::Client;

pub mod integration;
pub mod utils;

// Test database URLs. Both may point at the same server; the source side
// works in its own schema.
const TEST_SOURCE_URL_ENV: &str = "DBSHIFT_TEST_SOURCE_URL";
const TEST_DESTINATION_URL_ENV: &str = "DBSHIFT_TEST_DESTINATION_URL";

/// Tests share one source schema and the destination's public tables, so
/// they take this lock and run one at a time.
pub static DB_LOCK: Mutex<()> = Mutex::const_new(());

/// Source namespace the tests populate.
pub const TEST_SCHEMA: &str = "dbshift_it";

#[derive(Debug, Clone)]
pub struct TestUrls {
    pub source: String,
    pub destination: String,
}

/// `None` when the databases are not configured; tests return early then.
pub fn test_urls() -> Option<TestUrls> {
    let source = env::var(TEST_SOURCE_URL_ENV).ok()?;
    let destination = env::var(TEST_DESTINATION_URL_ENV).ok()?;
    Some(TestUrls {
        source,
        destination,
    })
}

pub fn test_settings(urls: &TestUrls, batch_size: u64, insert_mode: InsertMode) -> MigrationSettings {
    let mut settings = MigrationSettings::new(
        Endpoint::source(urls.source.as_str()),
        Endpoint::destination(urls.destination.as_str()),
    );
    settings.schema = TEST_SCHEMA.to_string();
    settings.batch_size = BatchSize::new(batch_size).expect("positive batch size");
    settings.insert_mode = insert_mode;
    settings
}

pub struct TestClient {
    pub client: Client,
    _connection: JoinHandle<()>,
}

impl std::ops::Deref for TestClient {
    type Target = Client;

    fn deref(&self) -> &Client {
        &self.client
    }
}

async fn client(url: &str) -> TestClient {
    let (client, connection) = connect_client(url).await.expect("connect postgres");
    TestClient {
        client,
        _connection: connection,
    }
}

pub async fn source_client(urls: &TestUrls) -> TestClient {
    client(&urls.source).await
}

pub async fn destination_client(urls: &TestUrls) -> TestClient {
    client(&urls.destination).await
}

/// Recreates the source schema empty and drops the destination tables the
/// tests write to.
pub async fn reset(urls: &TestUrls, tables: &[&str]) {
    let source = source_client(urls).await;
    source
        .batch_execute(&format!(
            "DROP SCHEMA IF EXISTS {TEST_SCHEMA} CASCADE; CREATE SCHEMA {TEST_SCHEMA};"
        ))
        .await
        .expect("reset source schema");

    let destination = destination_client(urls).await;
    for table in tables {
        destination
            .batch_execute(&format!("DROP TABLE IF EXISTS public.{table}"))
            .await
            .expect("drop destination table");
    }
}
