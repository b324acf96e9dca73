use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::normalize::NormalizedRow;
use crate::store::base::{
    HandleStore, HandleTransaction, StoreError, StoreResult, URL_HANDLE_TYPE,
};

#[derive(Debug, Default)]
struct Inner {
    /// Records keyed by `(handle, type)`.
    records: BTreeMap<(String, String), String>,
    failing_handles: HashSet<String>,
    update_calls: usize,
    commits: usize,
    rollbacks: usize,
}

/// In-memory record store for tests.
///
/// [`MemoryHandleStore`] keeps `(handle, type) -> data` records in memory and counts
/// the calls made against it, so callers can verify exactly which rows reached the
/// store. Clones share the same records.
#[derive(Debug, Clone, Default)]
pub struct MemoryHandleStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryHandleStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a record.
    pub async fn insert_record(&self, handle: &str, handle_type: &str, data: &str) {
        let mut inner = self.inner.lock().await;
        inner.records.insert(
            (handle.to_owned(), handle_type.to_owned()),
            data.to_owned(),
        );
    }

    /// Returns the data of a record, if present.
    pub async fn data(&self, handle: &str, handle_type: &str) -> Option<String> {
        let inner = self.inner.lock().await;
        inner
            .records
            .get(&(handle.to_owned(), handle_type.to_owned()))
            .cloned()
    }

    /// Makes every later update for `handle` fail with [`StoreError::Rejected`].
    pub async fn fail_updates_for(&self, handle: &str) {
        let mut inner = self.inner.lock().await;
        inner.failing_handles.insert(handle.to_owned());
    }

    /// Returns how many updates were issued against the store.
    pub async fn update_calls(&self) -> usize {
        self.inner.lock().await.update_calls
    }

    /// Returns how many transactions were committed.
    pub async fn commits(&self) -> usize {
        self.inner.lock().await.commits
    }

    /// Returns how many transactions were rolled back explicitly.
    pub async fn rollbacks(&self) -> usize {
        self.inner.lock().await.rollbacks
    }
}

impl HandleStore for MemoryHandleStore {
    type Transaction<'c> = MemoryHandleTransaction<'c>;

    async fn begin(&mut self) -> StoreResult<Self::Transaction<'_>> {
        Ok(MemoryHandleTransaction {
            store: self,
            pending: Vec::new(),
        })
    }
}

/// Transaction over a [`MemoryHandleStore`].
///
/// Updates are buffered and only applied to the shared records on commit.
#[derive(Debug)]
pub struct MemoryHandleTransaction<'c> {
    store: &'c MemoryHandleStore,
    pending: Vec<((String, String), String)>,
}

impl HandleTransaction for MemoryHandleTransaction<'_> {
    async fn update_url(&mut self, row: &NormalizedRow) -> StoreResult<u64> {
        let mut inner = self.store.inner.lock().await;
        inner.update_calls += 1;

        if inner.failing_handles.contains(&row.handle) {
            return Err(StoreError::Rejected(format!(
                "simulated failure for handle '{}'",
                row.handle
            )));
        }

        let key = (row.handle.clone(), URL_HANDLE_TYPE.to_owned());
        if !inner.records.contains_key(&key) {
            return Ok(0);
        }

        self.pending.push((key, row.url.clone()));

        Ok(1)
    }

    async fn commit(self) -> StoreResult<()> {
        let mut inner = self.store.inner.lock().await;
        inner.commits += 1;
        inner.records.extend(self.pending);

        Ok(())
    }

    async fn rollback(self) -> StoreResult<()> {
        let mut inner = self.store.inner.lock().await;
        inner.rollbacks += 1;

        Ok(())
    }
}
