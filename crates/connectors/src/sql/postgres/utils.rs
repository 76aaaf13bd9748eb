use crate::sql::base::error::ConnectorError;
use native_tls::TlsConnector;
use postgres_native_tls::MakeTlsConnector;
use tokio::task::JoinHandle;
use tokio_postgres::{Client, Config, NoTls, config::SslMode};
use tracing::{error, warn};

/// A client plus the task driving its socket. Dropping the client ends the
/// task; awaiting the handle afterwards confirms the session is gone.
pub type ClientHandle = (Client, JoinHandle<()>);

pub async fn connect_client(conn_str: &str) -> Result<ClientHandle, ConnectorError> {
    let config = conn_str
        .parse::<Config>()
        .map_err(|e| ConnectorError::InvalidUrl(e.to_string()))?;
    let ssl_mode = config.get_ssl_mode();

    match ssl_mode {
        SslMode::Disable => connect_without_tls(config).await,
        SslMode::Require => connect_with_tls(config).await,
        SslMode::Prefer => match connect_with_tls(config.clone()).await {
            Ok(client) => Ok(client),
            Err(error) => {
                warn!(%error, "Postgres TLS handshake failed, retrying without TLS");
                connect_without_tls(config).await
            }
        },
        _ => connect_with_tls(config).await,
    }
}

pub(crate) async fn connect_with_tls(config: Config) -> Result<ClientHandle, ConnectorError> {
    let connector = TlsConnector::builder().build()?;
    let tls = MakeTlsConnector::new(connector);
    let (client, connection) = config.connect(tls).await?;
    let handle = tokio::spawn(async move {
        if let Err(err) = connection.await {
            error!(%err, "Postgres connection error");
        }
    });
    Ok((client, handle))
}

pub(crate) async fn connect_without_tls(config: Config) -> Result<ClientHandle, ConnectorError> {
    let (client, connection) = config.connect(NoTls).await?;
    let handle = tokio::spawn(async move {
        if let Err(err) = connection.await {
            error!(%err, "Postgres connection error");
        }
    });
    Ok((client, handle))
}

/// Checks that a connection string parses, without connecting.
pub fn validate_conn_str(conn_str: &str) -> Result<(), ConnectorError> {
    conn_str
        .parse::<Config>()
        .map(|_| ())
        .map_err(|e| ConnectorError::InvalidUrl(e.to_string()))
}
