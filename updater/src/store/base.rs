use std::future::Future;

use thiserror::Error;

use crate::normalize::NormalizedRow;

/// Record type whose data holds the handle's target URL.
pub const URL_HANDLE_TYPE: &str = "URL";

/// Result type for record store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by a record store while applying a single row.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database driver reported an error.
    #[error("{0}")]
    Database(#[from] sqlx::Error),

    /// The store refused the operation without a driver error.
    #[error("{0}")]
    Rejected(String),
}

/// A record store holding `(handle, type, data)` records.
///
/// The store owns a single session which is reused for every row. Each row is
/// applied through its own [`HandleTransaction`].
pub trait HandleStore {
    /// Transaction type borrowed from the store's session.
    type Transaction<'c>: HandleTransaction
    where
        Self: 'c;

    /// Starts a new transaction on the store's session.
    fn begin(&mut self) -> impl Future<Output = StoreResult<Self::Transaction<'_>>>;
}

/// A transaction scoped to a single row.
///
/// Dropping a transaction without calling [`HandleTransaction::commit`] discards its
/// changes.
pub trait HandleTransaction {
    /// Sets the data of the [`URL_HANDLE_TYPE`] record for `row.handle` to `row.url`.
    ///
    /// Returns the number of records matched by the condition, whether or not their
    /// value actually changed.
    fn update_url(&mut self, row: &NormalizedRow) -> impl Future<Output = StoreResult<u64>>;

    /// Makes the transaction's changes durable.
    fn commit(self) -> impl Future<Output = StoreResult<()>>;

    /// Discards the transaction's changes.
    fn rollback(self) -> impl Future<Output = StoreResult<()>>;
}
