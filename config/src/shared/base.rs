use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The database host is empty.
    #[error("`database.host` cannot be empty")]
    EmptyHost,
    /// The database port is zero.
    #[error("`database.port` cannot be zero")]
    PortZero,
    /// The database user name is empty.
    #[error("`database.username` cannot be empty")]
    EmptyUsername,
    /// The database name is empty.
    #[error("`database.name` cannot be empty")]
    EmptyDatabaseName,
}
