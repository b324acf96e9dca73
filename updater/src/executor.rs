use tracing::{debug, warn};

use crate::normalize::NormalizedRow;
use crate::outcome::UpdateOutcome;
use crate::store::{HandleStore, HandleTransaction, StoreError};

/// Applies normalized rows to a [`HandleStore`], one transaction per row.
///
/// Store failures never escape: they are classified as
/// [`UpdateOutcome::DatabaseError`] and the next row starts a fresh transaction.
pub struct UpdateExecutor<'s, S> {
    store: &'s mut S,
}

impl<'s, S> UpdateExecutor<'s, S>
where
    S: HandleStore,
{
    /// Creates an executor over the store's session.
    pub fn new(store: &'s mut S) -> Self {
        Self { store }
    }

    /// Applies one row and classifies the result.
    ///
    /// A matched record is committed and reported as [`UpdateOutcome::Updated`]. When no
    /// record matches, the empty transaction is still committed to close it and the row
    /// is reported as [`UpdateOutcome::NotFound`]. Execution errors roll the transaction
    /// back.
    pub async fn execute(&mut self, line: u64, row: NormalizedRow) -> UpdateOutcome {
        let mut transaction = match self.store.begin().await {
            Ok(transaction) => transaction,
            Err(err) => return database_error(line, row, &err),
        };

        let matched = match transaction.update_url(&row).await {
            Ok(matched) => matched,
            Err(err) => {
                if let Err(rollback_err) = transaction.rollback().await {
                    warn!(line, handle = %row.handle, error = %rollback_err, "rollback failed");
                }

                return database_error(line, row, &err);
            }
        };

        if matched == 0 {
            if let Err(err) = transaction.commit().await {
                warn!(line, handle = %row.handle, error = %err, "closing empty transaction failed");
            }

            return UpdateOutcome::NotFound {
                line,
                handle: row.handle,
            };
        }

        if matched > 1 {
            warn!(line, handle = %row.handle, matched, "update matched more than one record");
        }

        match transaction.commit().await {
            Ok(()) => {
                debug!(line, handle = %row.handle, "handle url updated");

                UpdateOutcome::Updated {
                    line,
                    handle: row.handle,
                }
            }
            Err(err) => database_error(line, row, &err),
        }
    }
}

fn database_error(line: u64, row: NormalizedRow, err: &StoreError) -> UpdateOutcome {
    UpdateOutcome::DatabaseError {
        line,
        handle: row.handle,
        message: err.to_string(),
    }
}
