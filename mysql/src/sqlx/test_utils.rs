use config::shared::{IntoConnectOptions, MySqlConnectionConfig};
use secrecy::SecretString;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::{Connection, Executor};
use uuid::Uuid;

/// Builds connection settings for an isolated test database.
///
/// Configuration is read from environment variables:
/// - `TESTS_DATABASE_HOST`: MySQL server hostname (required)
/// - `TESTS_DATABASE_PORT`: MySQL server port (required)
/// - `TESTS_DATABASE_USERNAME`: Database user (required)
/// - `TESTS_DATABASE_PASSWORD`: Database password (optional)
///
/// Each invocation produces a unique database name to prevent test interference.
pub fn local_mysql_connection_config() -> MySqlConnectionConfig {
    MySqlConnectionConfig {
        host: std::env::var("TESTS_DATABASE_HOST").expect("TESTS_DATABASE_HOST must be set"),
        port: std::env::var("TESTS_DATABASE_PORT")
            .expect("TESTS_DATABASE_PORT must be set")
            .parse()
            .expect("TESTS_DATABASE_PORT must be a valid port number"),
        name: format!("handles_test_{}", Uuid::new_v4().simple()),
        username: std::env::var("TESTS_DATABASE_USERNAME")
            .expect("TESTS_DATABASE_USERNAME must be set"),
        password: std::env::var("TESTS_DATABASE_PASSWORD")
            .ok()
            .map(SecretString::new),
    }
}

/// Creates a new MySQL database with the `handles` table and returns a connection to it.
///
/// # Panics
/// Panics if connection, database creation or table creation fails.
pub async fn create_mysql_database(config: &MySqlConnectionConfig) -> MySqlConnection {
    let server_options: MySqlConnectOptions = config.without_db();
    let mut connection = MySqlConnection::connect_with(&server_options)
        .await
        .expect("Failed to connect to MySQL");

    connection
        .execute(&*format!("CREATE DATABASE `{}`", config.name))
        .await
        .expect("Failed to create database");

    let database_options: MySqlConnectOptions = config.with_db();
    let mut connection = MySqlConnection::connect_with(&database_options)
        .await
        .expect("Failed to connect to MySQL database");

    connection
        .execute(
            "CREATE TABLE handles (
                handle_id INT NOT NULL AUTO_INCREMENT PRIMARY KEY,
                handle VARCHAR(255) NOT NULL,
                type VARCHAR(32) NOT NULL,
                data TEXT,
                UNIQUE KEY handle_type (handle, type)
            )",
        )
        .await
        .expect("Failed to create handles table");

    connection
}

/// Drops a MySQL test database if it exists.
///
/// # Panics
/// Panics if any database operation fails.
pub async fn drop_mysql_database(config: &MySqlConnectionConfig) {
    let server_options: MySqlConnectOptions = config.without_db();
    let mut connection = MySqlConnection::connect_with(&server_options)
        .await
        .expect("Failed to connect to MySQL");

    connection
        .execute(&*format!("DROP DATABASE IF EXISTS `{}`", config.name))
        .await
        .expect("Failed to destroy database");
}
