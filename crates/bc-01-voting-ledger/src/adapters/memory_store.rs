use crate::domain::errors::StoreError;
use crate::ports::outbound::{LedgerStateStore, ScanResult, Version, VersionedValue, WriteBatch};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::ops::Bound;

/// In-memory ordered world state.
///
/// Every write (single `put` or whole batch) takes the next global version,
/// so versions double as a commit sequence number.
pub struct InMemoryStateStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    entries: BTreeMap<String, VersionedValue>,
    last_version: Version,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Number of keys in world state.
    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Version of the most recent write.
    pub fn last_version(&self) -> Version {
        self.inner.read().last_version
    }
}

impl Default for InMemoryStateStore {
    fn default() -> Self {
        Self::new()
    }
}

fn check_key(key: &str) -> Result<(), StoreError> {
    if key.is_empty() {
        return Err(StoreError::EmptyKey);
    }
    Ok(())
}

impl LedgerStateStore for InMemoryStateStore {
    fn get_versioned(&self, key: &str) -> Result<Option<VersionedValue>, StoreError> {
        check_key(key)?;
        Ok(self.inner.read().entries.get(key).cloned())
    }

    fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        check_key(key)?;
        let mut inner = self.inner.write();
        inner.last_version += 1;
        let version = inner.last_version;
        inner
            .entries
            .insert(key.to_string(), VersionedValue { value, version });
        Ok(())
    }

    fn range_scan(&self, start: &str, end: &str) -> Result<ScanResult, StoreError> {
        if !start.is_empty() && !end.is_empty() && start >= end {
            return Ok(Vec::new());
        }
        let lower = if start.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Included(start)
        };
        let upper = if end.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Excluded(end)
        };

        let inner = self.inner.read();
        let results = inner
            .entries
            .range::<str, _>((lower, upper))
            .map(|(k, v)| (k.clone(), v.value.clone()))
            .collect();
        Ok(results)
    }

    fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        for (key, _) in batch.writes() {
            check_key(key)?;
        }

        let mut inner = self.inner.write();
        for (key, expected) in batch.reads() {
            let actual = inner.entries.get(key).map(|entry| entry.version);
            if actual != *expected {
                return Err(StoreError::VersionConflict {
                    key: key.clone(),
                    expected: *expected,
                    actual,
                });
            }
        }

        if batch.is_empty() {
            return Ok(());
        }
        inner.last_version += 1;
        let version = inner.last_version;
        for (key, value) in batch.into_writes() {
            inner.entries.insert(key, VersionedValue { value, version });
        }
        Ok(())
    }
}
