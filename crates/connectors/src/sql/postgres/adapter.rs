use crate::sql::{
    base::{
        destination::DataDestination,
        error::{ConnectorError, DbError},
        query::{
            generator::QueryGenerator,
            statement::{Statement, StatementKind},
        },
        source::DataSource,
    },
    postgres::{
        params::PgParamStore,
        row::{PgColumnKind, decode_row},
        utils::connect_client,
    },
};
use async_trait::async_trait;
use model::{
    execution::connection::{Endpoint, EndpointRole},
    records::row::Row,
    schema::{column::ColumnDescriptor, table::TableDescriptor},
};
use tokio::task::JoinHandle;
use tokio_postgres::Client;
use tracing::{debug, info, warn};

const QUERY_LIST_TABLES_SQL: &str = include_str!("sql/list_tables.sql");
const QUERY_TABLE_COLUMNS_SQL: &str = include_str!("sql/table_columns.sql");
const QUERY_TABLE_PRIMARY_KEY_SQL: &str = include_str!("sql/table_primary_key.sql");

const BEGIN_SNAPSHOT_SQL: &str = "BEGIN ISOLATION LEVEL REPEATABLE READ READ ONLY";

/// One PostgreSQL session, used either as the source or as the destination
/// of a run.
pub struct PgConnection {
    client: Client,
    connection: JoinHandle<()>,
    role: EndpointRole,
    label: String,
    generator: QueryGenerator,
}

impl PgConnection {
    /// Connects and performs a round-trip before returning, so an
    /// unreachable endpoint fails here rather than on first use.
    pub async fn acquire(endpoint: &Endpoint) -> Result<Self, ConnectorError> {
        let label = endpoint.redacted();
        info!(role = %endpoint.role, endpoint = %label, "Establishing connection");

        let (client, connection) = connect_client(&endpoint.conn_str).await?;
        let conn = PgConnection {
            client,
            connection,
            role: endpoint.role,
            label,
            generator: QueryGenerator::quoted(),
        };
        conn.ping().await?;

        info!(role = %conn.role, endpoint = %conn.label, "Successfully connected");
        Ok(conn)
    }

    pub async fn ping(&self) -> Result<(), ConnectorError> {
        let row = self.client.query_one("SELECT 1", &[]).await?;
        let val: i32 = row.try_get(0)?;
        if val != 1 {
            return Err(ConnectorError::Ping(format!(
                "{} returned unexpected result: {val}",
                self.label
            )));
        }
        debug!(endpoint = %self.label, "Ping succeeded");
        Ok(())
    }

    /// Ends the session and waits for the connection task to finish.
    pub async fn close(self) {
        let PgConnection {
            client,
            connection,
            role,
            label,
            ..
        } = self;
        drop(client);
        if let Err(err) = connection.await {
            warn!(%role, endpoint = %label, %err, "Connection task did not shut down cleanly");
        }
        info!(%role, endpoint = %label, "Connection closed");
    }

    fn ensure_open(&self) -> Result<(), DbError> {
        if self.client.is_closed() {
            return Err(DbError::ConnectionClosed(self.label.clone()));
        }
        Ok(())
    }

    async fn primary_key(&self, schema: &str, table: &str) -> Result<Vec<String>, DbError> {
        let rows = self
            .client
            .query(QUERY_TABLE_PRIMARY_KEY_SQL, &[&schema, &table])
            .await?;
        let columns = rows
            .iter()
            .map(|row| row.try_get::<_, String>(0))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(columns)
    }

    /// Primary key order when there is one, physical row order otherwise.
    /// Both are stable for a table nobody writes to while it is read.
    fn window_order(&self, table: &TableDescriptor) -> Vec<String> {
        if table.primary_key.is_empty() {
            vec!["ctid".to_string()]
        } else {
            table
                .primary_key
                .iter()
                .map(|c| self.generator.ident(c))
                .collect()
        }
    }
}

#[async_trait]
impl DataSource for PgConnection {
    async fn list_tables(&mut self, schema: &str) -> Result<Vec<String>, DbError> {
        self.ensure_open()?;
        let rows = self.client.query(QUERY_LIST_TABLES_SQL, &[&schema]).await?;
        let tables = rows
            .iter()
            .map(|row| row.try_get::<_, String>(0))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tables)
    }

    async fn begin_snapshot(&mut self) -> Result<(), DbError> {
        self.ensure_open()?;
        self.client.batch_execute(BEGIN_SNAPSHOT_SQL).await?;
        Ok(())
    }

    async fn end_snapshot(&mut self) -> Result<(), DbError> {
        // read-only, so rolling back and committing are equivalent; ROLLBACK
        // also clears a transaction aborted by a failed read
        self.client.batch_execute("ROLLBACK").await?;
        Ok(())
    }

    async fn describe(&mut self, schema: &str, table: &str) -> Result<TableDescriptor, DbError> {
        self.ensure_open()?;
        let rows = self
            .client
            .query(QUERY_TABLE_COLUMNS_SQL, &[&schema, &table])
            .await?;

        let columns = rows
            .iter()
            .map(|row| -> Result<ColumnDescriptor, DbError> {
                let name: String = row.try_get(0)?;
                let declared_type: String = row.try_get(1)?;
                let is_nullable: String = row.try_get(2)?;
                let cast_type: String = row.try_get(3)?;
                Ok(ColumnDescriptor::new(
                    name,
                    declared_type,
                    is_nullable.eq_ignore_ascii_case("YES"),
                )
                .with_cast_type(cast_type))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let primary_key = self.primary_key(schema, table).await?;
        Ok(TableDescriptor::new(schema, table, columns).with_primary_key(primary_key))
    }

    async fn count_rows(&mut self, table: &TableDescriptor) -> Result<u64, DbError> {
        let sql = self.generator.count_rows(table);
        let row = self.client.query_one(sql.as_str(), &[]).await?;
        let count: i64 = row.try_get(0)?;
        Ok(count.max(0) as u64)
    }

    async fn fetch_window(
        &mut self,
        table: &TableDescriptor,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Row>, DbError> {
        let kinds = table
            .columns
            .iter()
            .map(|c| PgColumnKind::from_declared_type(&c.declared_type))
            .collect::<Vec<_>>();
        let select_exprs = table
            .columns
            .iter()
            .zip(&kinds)
            .map(|(c, kind)| kind.select_expr(&self.generator.ident(&c.name)))
            .collect::<Vec<_>>();
        let order_by = self.window_order(table);

        let sql = self
            .generator
            .select_window(table, &select_exprs, &order_by, offset, limit);
        debug!(table = %table.name, offset, limit, "Fetching window");

        let rows = self.client.query(sql.as_str(), &[]).await?;
        rows.iter()
            .map(|row| decode_row(row, &table.columns, &kinds))
            .collect()
    }
}

#[async_trait]
impl DataDestination for PgConnection {
    async fn begin(&mut self) -> Result<(), DbError> {
        self.ensure_open()?;
        self.client.batch_execute("BEGIN").await?;
        Ok(())
    }

    async fn commit(&mut self) -> Result<(), DbError> {
        self.client.batch_execute("COMMIT").await?;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), DbError> {
        self.client.batch_execute("ROLLBACK").await?;
        Ok(())
    }

    async fn execute(&mut self, statement: &Statement) -> Result<u64, DbError> {
        self.ensure_open()?;
        let bindings = PgParamStore::from_values(&statement.params);
        debug!(
            table = %statement.table,
            kind = ?statement.kind,
            rows = statement.rows,
            params = bindings.len(),
            "Executing statement"
        );

        let affected = self
            .client
            .execute(statement.sql.as_str(), &bindings.as_refs())
            .await?;

        if statement.kind == StatementKind::Insert && affected != statement.rows as u64 {
            return Err(DbError::RowCountMismatch {
                table: statement.table.clone(),
                expected: statement.rows,
                actual: affected,
            });
        }
        Ok(affected)
    }
}
