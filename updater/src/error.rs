use std::error::Error;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for fatal updater operations.
pub type UpdaterResult<T> = Result<T, UpdaterError>;

/// Errors that abort an update run.
///
/// Row-level problems never surface here; they are classified as
/// [`crate::outcome::UpdateOutcome`]s and the run continues.
#[derive(Debug, Error)]
pub enum UpdaterError {
    /// The input file does not exist.
    #[error("input file `{}` does not exist", .path.display())]
    InputNotFound { path: PathBuf },

    /// The input file exists but could not be opened.
    #[error("failed to open input file `{}`: {}", .path.display(), .source)]
    Input {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A record in the input could not be decoded.
    #[error("failed to read input record: {0}")]
    Csv(#[from] csv::Error),

    /// The record store connection could not be established.
    #[error("failed to connect to record store: {0}")]
    Connection(#[source] sqlx::Error),

    /// Configuration could not be loaded or is invalid.
    #[error("configuration error: {0}")]
    Config(#[source] Box<dyn Error + Send + Sync>),

    /// Any other I/O failure, including writing the report or error log.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

impl UpdaterError {
    /// Returns a short category label for this error.
    pub fn category(&self) -> &'static str {
        match self {
            UpdaterError::InputNotFound { .. } | UpdaterError::Input { .. } => "input error",
            UpdaterError::Csv(_) => "input decoding error",
            UpdaterError::Connection(_) => "connection error",
            UpdaterError::Config(_) => "configuration error",
            UpdaterError::Io(_) => "i/o error",
        }
    }

    /// Creates a configuration error from any error source.
    pub fn config<E: Error + Send + Sync + 'static>(err: E) -> Self {
        UpdaterError::Config(Box::new(err))
    }

    /// Renders the single line reported to the operator when the run aborts.
    pub fn fatal_message(&self) -> String {
        match self {
            UpdaterError::InputNotFound { path } => {
                format!("FATAL: CSV file not found at '{}'", path.display())
            }
            UpdaterError::Connection(err) => format!("FATAL: Database connection error: {err}"),
            other => format!("FATAL: An unexpected error occurred: {other}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_input_renders_path() {
        let err = UpdaterError::InputNotFound {
            path: PathBuf::from("missing.csv"),
        };

        assert_eq!(err.category(), "input error");
        assert_eq!(
            err.fatal_message(),
            "FATAL: CSV file not found at 'missing.csv'"
        );
    }

    #[test]
    fn connection_errors_have_their_own_message() {
        let err = UpdaterError::Connection(sqlx::Error::PoolTimedOut);

        assert_eq!(err.category(), "connection error");
        assert!(
            err.fatal_message()
                .starts_with("FATAL: Database connection error: ")
        );
    }

    #[test]
    fn other_errors_are_unexpected() {
        let err = UpdaterError::from(io::Error::other("disk full"));

        assert_eq!(
            err.fatal_message(),
            "FATAL: An unexpected error occurred: i/o error: disk full"
        );
    }
}
