use config::shared::{IntoConnectOptions, MySqlConnectionConfig};
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::Connection;
use tracing::{debug, info};

/// Opens the single connection used for every row of an update run.
///
/// The connection selects the configured database. It is not pooled: the updater
/// reuses it sequentially and closes it once the run finishes.
pub async fn connect_to_record_store(
    config: &MySqlConnectionConfig,
) -> Result<MySqlConnection, sqlx::Error> {
    let options: MySqlConnectOptions = config.with_db();
    let connection = MySqlConnection::connect_with(&options).await?;

    info!(
        host = %config.host,
        port = config.port,
        database = %config.name,
        "connected to record store"
    );

    Ok(connection)
}

/// Closes a record store connection, logging instead of failing if the server is gone.
pub async fn close_record_store(connection: MySqlConnection) {
    if let Err(err) = connection.close().await {
        debug!(error = %err, "record store connection did not close cleanly");
    }
}
