//! Handle URL updater binary.
//!
//! Reads a two-column CSV file (`new url, handle`) and points each handle's URL
//! record at the new value, one transaction per row. Per-row results go to
//! stdout/stderr, failures are appended to a per-run error log, and a summary is
//! printed before exiting.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Local;
use clap::Parser;
use telemetry::tracing::init_tracing;
use tracing::{error, info};
use updater::aggregator::OutcomeAggregator;
use updater::configuration::load_updater_config;
use updater::error::{UpdaterError, UpdaterResult};
use updater::error_log::{DEFAULT_LOG_DIR, ErrorLog};
use updater::pipeline::run;

/// Command line arguments.
#[derive(Debug, Parser)]
#[command(name = "update-handle-urls", version, about)]
struct AppArgs {
    /// Two-column CSV file: new URL, then handle (optionally as an hdl.handle.net URL)
    csv_file: PathBuf,
    /// Directory where the per-run error log is created
    #[arg(long, default_value = DEFAULT_LOG_DIR)]
    log_dir: PathBuf,
}

/// Entry point for the updater.
///
/// Argument errors exit with status 1 before anything else happens. Once the error
/// log exists, every path ends by printing the summary exactly once.
fn main() -> ExitCode {
    let args = match AppArgs::try_parse() {
        Ok(args) => args,
        Err(err) => {
            if let Err(print_err) = err.print() {
                eprintln!("{print_err}");
            }
            return usage_exit_code(&err);
        }
    };

    if let Err(err) = init_tracing(env!("CARGO_BIN_NAME")) {
        eprintln!("{err}");
    }

    let started_at = Local::now();
    let error_log = match ErrorLog::create(&args.log_dir, started_at) {
        Ok(error_log) => error_log,
        Err(err) => {
            error!(log_dir = %args.log_dir.display(), "failed to create error log: {err}");
            eprintln!(
                "FATAL: Could not create error log in '{}': {err}",
                args.log_dir.display()
            );
            return ExitCode::FAILURE;
        }
    };
    info!(path = %error_log.path().display(), "logging row errors");

    let mut aggregator = OutcomeAggregator::new(io::stdout(), io::stderr(), error_log);
    let result = update(&args, &mut aggregator);

    if let Err(err) = &result {
        error!(category = err.category(), "{err}");
    }
    aggregator.conclude(&result);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

/// Help and version requests succeed; every other argument error fails.
fn usage_exit_code(err: &clap::Error) -> ExitCode {
    if err.use_stderr() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Loads configuration and drives the pipeline on a single-threaded runtime.
fn update(
    args: &AppArgs,
    aggregator: &mut OutcomeAggregator<io::Stdout, io::Stderr>,
) -> UpdaterResult<()> {
    let config = load_updater_config()?;

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(UpdaterError::Io)?
        .block_on(run(&config, &args.csv_file, aggregator))
}
