use std::io::{Read, Write};
use std::path::Path;

use config::shared::UpdaterConfig;
use tracing::info;

use crate::aggregator::OutcomeAggregator;
use crate::error::{UpdaterError, UpdaterResult};
use crate::executor::UpdateExecutor;
use crate::normalize::normalize_row;
use crate::outcome::UpdateOutcome;
use crate::source::RowSource;
use crate::store::{HandleStore, MySqlHandleStore};

/// Runs a full update of `input` against the configured MySQL record store.
///
/// The input is opened before connecting, so a missing file never reaches the
/// database. The connection is closed whether or not processing succeeds.
pub async fn run<O, D>(
    config: &UpdaterConfig,
    input: &Path,
    aggregator: &mut OutcomeAggregator<O, D>,
) -> UpdaterResult<()>
where
    O: Write,
    D: Write,
{
    let rows = RowSource::open(input)?;

    let mut store = MySqlHandleStore::connect(&config.database)
        .await
        .map_err(UpdaterError::Connection)?;

    let result = process_rows(&mut store, rows, aggregator).await;
    store.close().await;

    result
}

/// Pushes every row through normalization and execution, in input order.
///
/// Row-level failures are recorded and processing continues. Only input decoding
/// errors and report write failures stop the loop.
pub async fn process_rows<S, R, O, D>(
    store: &mut S,
    rows: RowSource<R>,
    aggregator: &mut OutcomeAggregator<O, D>,
) -> UpdaterResult<()>
where
    S: HandleStore,
    R: Read,
    O: Write,
    D: Write,
{
    let mut executor = UpdateExecutor::new(store);

    for row in rows {
        let row = row?;
        let line = row.line;

        let outcome = match normalize_row(row) {
            Ok(normalized) => executor.execute(line, normalized).await,
            Err(reason) => UpdateOutcome::Invalid { line, reason },
        };

        aggregator.record(&outcome)?;
    }

    let summary = aggregator.summary();
    info!(
        updated = summary.updated_count,
        errors = summary.error_count,
        "finished processing input"
    );

    Ok(())
}
