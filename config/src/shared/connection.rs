use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use sqlx::mysql::MySqlConnectOptions as SqlxConnectOptions;

use crate::shared::ValidationError;

/// Character set requested for every record store connection.
const CONNECTION_CHARSET: &str = "utf8mb4";

/// Configuration for connecting to the MySQL record store.
///
/// The password is sensitive and redacted in debug output. This intentionally does not
/// implement `Serialize` so the secret cannot leak into serialized forms.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MySqlConnectionConfig {
    /// Hostname or IP address of the MySQL server.
    pub host: String,
    /// Port number on which the MySQL server is listening.
    pub port: u16,
    /// Name of the database holding the `handles` table.
    pub name: String,
    /// User name for authenticating with the MySQL server.
    pub username: String,
    /// Password for the specified user.
    pub password: Option<SecretString>,
}

impl MySqlConnectionConfig {
    /// Validates the [`MySqlConnectionConfig`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.host.is_empty() {
            return Err(ValidationError::EmptyHost);
        }
        if self.port == 0 {
            return Err(ValidationError::PortZero);
        }
        if self.username.is_empty() {
            return Err(ValidationError::EmptyUsername);
        }
        if self.name.is_empty() {
            return Err(ValidationError::EmptyDatabaseName);
        }

        Ok(())
    }
}

/// A trait which can be used to convert the implementation into crate specific
/// connect options.
pub trait IntoConnectOptions<Output> {
    /// Creates connection options for connecting to the server without selecting a database.
    ///
    /// Useful for administrative operations such as creating or dropping the database itself.
    fn without_db(&self) -> Output;

    /// Creates connection options for connecting to the configured database.
    fn with_db(&self) -> Output;
}

impl IntoConnectOptions<SqlxConnectOptions> for MySqlConnectionConfig {
    fn without_db(&self) -> SqlxConnectOptions {
        let mut options = SqlxConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .charset(CONNECTION_CHARSET);

        if let Some(password) = &self.password {
            options = options.password(password.expose_secret());
        }

        options
    }

    fn with_db(&self) -> SqlxConnectOptions {
        let options: SqlxConnectOptions = self.without_db();
        options.database(&self.name)
    }
}
