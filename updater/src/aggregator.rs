use std::fmt;
use std::io::{self, Write};
use std::path::PathBuf;

use tracing::warn;

use crate::error::{UpdaterError, UpdaterResult};
use crate::error_log::{ErrorLog, LogLevel};
use crate::outcome::UpdateOutcome;

/// Final counts of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Rows whose record was updated.
    pub updated_count: u64,
    /// Rows that were invalid, not found or failed in the store.
    pub error_count: u64,
    /// Location of the run's error log.
    pub error_log_path: PathBuf,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "--- Summary ---")?;
        writeln!(f, "Successfully updated rows: {}", self.updated_count)?;
        writeln!(f, "Rows with errors/not found: {}", self.error_count)?;
        write!(
            f,
            "Error details logged to: '{}'",
            self.error_log_path.display()
        )
    }
}

/// Collects row outcomes, reports them, and prints the summary once.
///
/// Successes go to `out`, failures go to `diagnostics` and to the [`ErrorLog`].
/// [`OutcomeAggregator::finish`] consumes the aggregator, so the summary cannot be
/// printed twice.
pub struct OutcomeAggregator<O, D> {
    out: O,
    diagnostics: D,
    error_log: ErrorLog,
    updated_count: u64,
    error_count: u64,
}

impl<O, D> OutcomeAggregator<O, D>
where
    O: Write,
    D: Write,
{
    /// Creates an aggregator with zeroed counters.
    pub fn new(out: O, diagnostics: D, error_log: ErrorLog) -> Self {
        Self {
            out,
            diagnostics,
            error_log,
            updated_count: 0,
            error_count: 0,
        }
    }

    /// Counts and reports one outcome.
    pub fn record(&mut self, outcome: &UpdateOutcome) -> io::Result<()> {
        if outcome.is_success() {
            self.updated_count += 1;
            return writeln!(self.out, "{outcome}");
        }

        self.error_count += 1;
        let message = outcome.to_string();
        match outcome {
            UpdateOutcome::NotFound { .. } => writeln!(self.diagnostics, "WARNING: {message}")?,
            _ => writeln!(self.diagnostics, "{message}")?,
        }

        self.error_log.write(LogLevel::Error, &message)
    }

    /// Reports an error that aborted the run.
    pub fn fatal(&mut self, error: &UpdaterError) {
        let message = error.fatal_message();

        if let Err(err) = writeln!(self.diagnostics, "{message}") {
            warn!(error = %err, "failed to report fatal error");
        }
        if let Err(err) = self.error_log.write(LogLevel::Critical, &message) {
            warn!(error = %err, "failed to write fatal error to error log");
        }
    }

    /// Returns the counts accumulated so far.
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            updated_count: self.updated_count,
            error_count: self.error_count,
            error_log_path: self.error_log.path().to_path_buf(),
        }
    }

    /// Reports the run's fatal error, if any, then prints the summary.
    pub fn conclude(mut self, result: &UpdaterResult<()>) -> RunSummary {
        if let Err(err) = result {
            self.fatal(err);
        }

        self.finish()
    }

    /// Prints the summary and releases the output streams and error log.
    pub fn finish(mut self) -> RunSummary {
        let summary = self.summary();

        if let Err(err) = writeln!(self.out, "{summary}").and_then(|()| self.out.flush()) {
            warn!(error = %err, "failed to print run summary");
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use chrono::Local;

    use super::*;
    use crate::outcome::InvalidRow;

    fn aggregator(dir: &tempfile::TempDir) -> OutcomeAggregator<Vec<u8>, Vec<u8>> {
        let error_log = ErrorLog::create(dir.path(), Local::now()).unwrap();
        OutcomeAggregator::new(Vec::new(), Vec::new(), error_log)
    }

    #[test]
    fn outcomes_are_counted_and_routed() {
        let dir = tempfile::tempdir().unwrap();
        let mut aggregator = aggregator(&dir);

        let outcomes = [
            UpdateOutcome::Updated {
                line: 1,
                handle: "10.1/a".to_string(),
            },
            UpdateOutcome::NotFound {
                line: 2,
                handle: "10.1/zzz".to_string(),
            },
            UpdateOutcome::Invalid {
                line: 3,
                reason: InvalidRow::ColumnCount(3),
            },
            UpdateOutcome::DatabaseError {
                line: 4,
                handle: "10.1/b".to_string(),
                message: "deadlock".to_string(),
            },
        ];
        for outcome in &outcomes {
            aggregator.record(outcome).unwrap();
        }

        let summary = aggregator.summary();
        assert_eq!(summary.updated_count, 1);
        assert_eq!(summary.error_count, 3);

        let out = String::from_utf8(aggregator.out.clone()).unwrap();
        let diagnostics = String::from_utf8(aggregator.diagnostics.clone()).unwrap();
        assert_eq!(out, "Successfully updated handle '10.1/a' (from line 1)\n");
        assert_eq!(
            diagnostics,
            "WARNING: No row found or updated for handle '10.1/zzz' (from line 2)\n\
             Skipping line 3: Invalid format (expected 2 columns, found 3)\n\
             Database error updating handle '10.1/b' (from line 4): deadlock\n"
        );

        let log = fs::read_to_string(&summary.error_log_path).unwrap();
        assert_eq!(log.lines().count(), 3);
        assert!(log.lines().all(|line| line.contains(" - ERROR - ")));
    }

    #[test]
    fn summary_is_printed_after_a_fatal_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut aggregator = aggregator(&dir);
        aggregator
            .record(&UpdateOutcome::Updated {
                line: 1,
                handle: "10.1/a".to_string(),
            })
            .unwrap();

        let err = UpdaterError::from(io::Error::other("broken pipe"));
        aggregator.fatal(&err);
        let diagnostics = String::from_utf8(aggregator.diagnostics.clone()).unwrap();
        let summary = aggregator.finish();

        assert_eq!(summary.updated_count, 1);
        assert_eq!(summary.error_count, 0);
        assert_eq!(
            diagnostics,
            "FATAL: An unexpected error occurred: i/o error: broken pipe\n"
        );

        let log = fs::read_to_string(&summary.error_log_path).unwrap();
        assert!(log.contains(" - CRITICAL - FATAL: An unexpected error occurred"));
    }

    #[test]
    fn summary_lists_counts_and_log_location() {
        let summary = RunSummary {
            updated_count: 2,
            error_count: 1,
            error_log_path: PathBuf::from("log/errors-2024-05-01-090307.log"),
        };

        assert_eq!(
            summary.to_string(),
            "\n--- Summary ---\n\
             Successfully updated rows: 2\n\
             Rows with errors/not found: 1\n\
             Error details logged to: 'log/errors-2024-05-01-090307.log'"
        );
    }
}
