//! Store wrappers for exercising failure windows and interleavings.

use crate::domain::errors::StoreError;
use crate::ports::outbound::{LedgerStateStore, ScanResult, VersionedValue, WriteBatch};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Barrier;

/// Wraps a store and fails selected writes with [`StoreError::Unavailable`].
pub struct FaultyStore<S> {
    inner: S,
    puts_before_failure: Mutex<Option<usize>>,
    fail_commits: AtomicBool,
    fail_reads: AtomicBool,
}

impl<S: LedgerStateStore> FaultyStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            puts_before_failure: Mutex::new(None),
            fail_commits: AtomicBool::new(false),
            fail_reads: AtomicBool::new(false),
        }
    }

    /// Let `n` more puts through, then fail every put until [`heal`](Self::heal).
    pub fn fail_puts_after(&self, n: usize) {
        *self.puts_before_failure.lock() = Some(n);
    }

    pub fn fail_commits(&self, fail: bool) {
        self.fail_commits.store(fail, Ordering::SeqCst);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn heal(&self) {
        *self.puts_before_failure.lock() = None;
        self.fail_commits(false);
        self.fail_reads(false);
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn injected(what: &str) -> StoreError {
        StoreError::Unavailable(format!("injected {what} failure"))
    }
}

impl<S: LedgerStateStore> LedgerStateStore for FaultyStore<S> {
    fn get_versioned(&self, key: &str) -> Result<Option<VersionedValue>, StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Self::injected("read"));
        }
        self.inner.get_versioned(key)
    }

    fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        {
            let mut budget = self.puts_before_failure.lock();
            match budget.as_mut() {
                Some(0) => return Err(Self::injected("put")),
                Some(n) => *n -= 1,
                None => {}
            }
        }
        self.inner.put(key, value)
    }

    fn range_scan(&self, start: &str, end: &str) -> Result<ScanResult, StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Self::injected("scan"));
        }
        self.inner.range_scan(start, end)
    }

    fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        if self.fail_commits.load(Ordering::SeqCst) {
            return Err(Self::injected("commit"));
        }
        self.inner.commit(batch)
    }
}

/// Holds the first `parties` reads of each gated key at a barrier, so
/// concurrent callers all observe the same pre-write state.
pub struct GatedStore<S> {
    inner: S,
    parties: usize,
    gates: Vec<Gate>,
}

struct Gate {
    key: String,
    seen: AtomicUsize,
    barrier: Barrier,
}

impl<S: LedgerStateStore> GatedStore<S> {
    pub fn new<K: Into<String>>(
        inner: S,
        keys: impl IntoIterator<Item = K>,
        parties: usize,
    ) -> Self {
        let gates = keys
            .into_iter()
            .map(|key| Gate {
                key: key.into(),
                seen: AtomicUsize::new(0),
                barrier: Barrier::new(parties),
            })
            .collect();
        Self {
            inner,
            parties,
            gates,
        }
    }
}

impl<S: LedgerStateStore> LedgerStateStore for GatedStore<S> {
    fn get_versioned(&self, key: &str) -> Result<Option<VersionedValue>, StoreError> {
        let value = self.inner.get_versioned(key)?;
        if let Some(gate) = self.gates.iter().find(|gate| gate.key == key) {
            if gate.seen.fetch_add(1, Ordering::SeqCst) < self.parties {
                gate.barrier.wait();
            }
        }
        Ok(value)
    }

    fn put(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        self.inner.put(key, value)
    }

    fn range_scan(&self, start: &str, end: &str) -> Result<ScanResult, StoreError> {
        self.inner.range_scan(start, end)
    }

    fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        self.inner.commit(batch)
    }
}
