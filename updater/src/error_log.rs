use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, LineWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

/// Directory receiving error logs unless overridden on the command line.
pub const DEFAULT_LOG_DIR: &str = "log";

/// Severity recorded in front of each error log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// A single row failed.
    Error,
    /// The run was aborted.
    Critical,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Error => f.write_str("ERROR"),
            LogLevel::Critical => f.write_str("CRITICAL"),
        }
    }
}

/// Append-only, line-oriented log of every failure in one run.
///
/// Lines look like `2024-05-01 12:00:00,123 - ERROR - <message>` and are flushed as
/// they are written.
pub struct ErrorLog {
    path: PathBuf,
    writer: LineWriter<File>,
}

impl ErrorLog {
    /// Returns the file name used for a run started at `started_at`.
    pub fn file_name(started_at: DateTime<Local>) -> String {
        format!("errors-{}.log", started_at.format("%Y-%m-%d-%H%M%S"))
    }

    /// Creates (or reopens for appending) the log for a run started at `started_at`.
    ///
    /// The directory is created if it does not exist yet.
    pub fn create(directory: &Path, started_at: DateTime<Local>) -> io::Result<Self> {
        fs::create_dir_all(directory)?;

        let path = directory.join(Self::file_name(started_at));
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            path,
            writer: LineWriter::new(file),
        })
    }

    /// Returns where the log is written.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one timestamped line.
    pub fn write(&mut self, level: LogLevel, message: &str) -> io::Result<()> {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S,%3f");
        writeln!(self.writer, "{timestamp} - {level} - {message}")
    }
}
