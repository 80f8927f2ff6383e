//! # Outbound Ports (Driven Ports)
//!
//! The world-state store the chaincode executes against.
//!
//! Testing: `InMemoryStateStore` (adapters/memory_store.rs)

use crate::domain::errors::StoreError;

/// Monotonic per-key write version, assigned by the store.
pub type Version = u64;

/// Result of a range scan: `(key, value)` pairs in ascending key order.
pub type ScanResult = Vec<(String, Vec<u8>)>;

/// A value together with the version of the write that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedValue {
    pub value: Vec<u8>,
    pub version: Version,
}

/// Ordered key-value world state.
///
/// Individual operations are linearizable. Sequences of operations are not:
/// callers needing multi-key atomicity submit a [`WriteBatch`].
pub trait LedgerStateStore: Send + Sync {
    /// Get a value by key.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.get_versioned(key)?.map(|entry| entry.value))
    }

    /// Get a value and the version that wrote it.
    fn get_versioned(&self, key: &str) -> Result<Option<VersionedValue>, StoreError>;

    /// Put a single key-value pair, overwriting any existing value.
    fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError>;

    /// Scan `[start, end)` in key order. An empty bound is unbounded, so
    /// `range_scan("", "")` returns the whole keyspace.
    fn range_scan(&self, start: &str, end: &str) -> Result<ScanResult, StoreError>;

    /// Apply a batch atomically.
    ///
    /// Every read recorded in the batch is re-validated against the current
    /// version first; on any mismatch nothing is written and
    /// [`StoreError::VersionConflict`] is returned.
    fn commit(&self, batch: WriteBatch) -> Result<(), StoreError>;
}

/// Read set plus write set of one atomic commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    reads: Vec<(String, Option<Version>)>,
    writes: Vec<(String, Vec<u8>)>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `key` was read at `version` (`None` = absent).
    pub fn expect(&mut self, key: impl Into<String>, version: Option<Version>) -> &mut Self {
        self.reads.push((key.into(), version));
        self
    }

    /// Queue a write. Later writes to the same key win.
    pub fn put(&mut self, key: impl Into<String>, value: Vec<u8>) -> &mut Self {
        self.writes.push((key.into(), value));
        self
    }

    pub fn reads(&self) -> &[(String, Option<Version>)] {
        &self.reads
    }

    pub fn writes(&self) -> &[(String, Vec<u8>)] {
        &self.writes
    }

    pub fn into_writes(self) -> Vec<(String, Vec<u8>)> {
        self.writes
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}

impl<S: LedgerStateStore + ?Sized> LedgerStateStore for std::sync::Arc<S> {
    fn get_versioned(&self, key: &str) -> Result<Option<VersionedValue>, StoreError> {
        (**self).get_versioned(key)
    }

    fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        (**self).put(key, value)
    }

    fn range_scan(&self, start: &str, end: &str) -> Result<ScanResult, StoreError> {
        (**self).range_scan(start, end)
    }

    fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        (**self).commit(batch)
    }
}
