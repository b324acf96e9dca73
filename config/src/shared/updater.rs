use serde::Deserialize;

use crate::Config;
use crate::shared::{MySqlConnectionConfig, ValidationError};

/// Complete configuration for the handle updater.
///
/// Built once at startup and passed by reference to whatever needs it.
#[derive(Debug, Deserialize)]
pub struct UpdaterConfig {
    /// Connection settings for the record store.
    pub database: MySqlConnectionConfig,
}

impl UpdaterConfig {
    /// Validates the complete updater configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.database.validate()
    }
}

impl Config for UpdaterConfig {
    const DEFAULTS: &'static [(&'static str, &'static str)] = &[
        ("database.host", "localhost"),
        ("database.port", "3306"),
        ("database.username", "username"),
        ("database.password", "password"),
        ("database.name", "your_database_name"),
    ];

    const ENV_ALIASES: &'static [(&'static str, &'static str)] = &[
        ("DB_HOST", "database.host"),
        ("DB_PORT", "database.port"),
        ("DB_USER", "database.username"),
        ("DB_PASSWORD", "database.password"),
        ("DB_NAME", "database.name"),
    ];
}
