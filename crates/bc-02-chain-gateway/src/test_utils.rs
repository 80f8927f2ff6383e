//! Test doubles for the gateway ports.

use crate::adapters::InMemoryRegistrationStore;
use crate::domain::error::{CacheError, GatewayError, LedgerError, LocalStoreError};
use crate::domain::registration::{NewRegistration, RegistrationRecord};
use crate::ports::inbound::QueryExecutor;
use crate::ports::outbound::{CacheBackend, LedgerClient, RegistrationStore};
use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::{Invocation, TransactionReceipt};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Query executor returning a fixed response and counting calls.
pub struct CountingExecutor {
    response: Mutex<Result<String, GatewayError>>,
    calls: AtomicUsize,
}

impl CountingExecutor {
    pub fn returning(value: impl Into<String>) -> Self {
        Self {
            response: Mutex::new(Ok(value.into())),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: GatewayError) -> Self {
        Self {
            response: Mutex::new(Err(error)),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_response(&self, value: impl Into<String>) {
        *self.response.lock() = Ok(value.into());
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QueryExecutor for CountingExecutor {
    async fn execute(
        &self,
        _channel: &str,
        _contract: &str,
        _function: &str,
        _args: &[String],
    ) -> Result<String, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.lock().clone()
    }
}

/// Cache backend whose every operation fails.
pub struct FailingCache;

#[async_trait]
impl CacheBackend for FailingCache {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Err(CacheError::Unavailable("connection refused".into()))
    }

    async fn set(&self, _key: &str, _value: String, _ttl: Duration) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("connection refused".into()))
    }
}

/// Cache backend whose operations never complete.
pub struct StallingCache;

#[async_trait]
impl CacheBackend for StallingCache {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        std::future::pending().await
    }

    async fn set(&self, _key: &str, _value: String, _ttl: Duration) -> Result<(), CacheError> {
        std::future::pending().await
    }
}

/// Ledger client that answers after a fixed delay on the tokio clock.
pub struct SlowLedger {
    delay: Duration,
    calls: AtomicUsize,
}

impl SlowLedger {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LedgerClient for SlowLedger {
    async fn submit(&self, _invocation: &Invocation) -> Result<TransactionReceipt, LedgerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        Ok(TransactionReceipt {
            transaction_id: "slow-tx".into(),
            payload: String::new(),
        })
    }

    async fn evaluate(&self, _invocation: &Invocation) -> Result<String, LedgerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        Ok("[]".into())
    }
}

/// Registration store whose next `n` `mark_registered` calls fail.
pub struct FlakyRegistrationStore {
    inner: InMemoryRegistrationStore,
    mark_failures: AtomicUsize,
}

impl FlakyRegistrationStore {
    pub fn failing_marks(n: usize) -> Self {
        Self {
            inner: InMemoryRegistrationStore::new(),
            mark_failures: AtomicUsize::new(n),
        }
    }

    pub fn inner(&self) -> &InMemoryRegistrationStore {
        &self.inner
    }
}

#[async_trait]
impl RegistrationStore for FlakyRegistrationStore {
    async fn find_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<RegistrationRecord>, LocalStoreError> {
        self.inner.find_by_external_id(external_id).await
    }

    async fn insert(
        &self,
        registration: NewRegistration,
    ) -> Result<RegistrationRecord, LocalStoreError> {
        self.inner.insert(registration).await
    }

    async fn mark_registered(&self, external_id: &str) -> Result<(), LocalStoreError> {
        let failing = self
            .mark_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(LocalStoreError::Unavailable("db down".into()));
        }
        self.inner.mark_registered(external_id).await
    }

    async fn set_submitted(
        &self,
        external_id: &str,
        submitted: bool,
    ) -> Result<(), LocalStoreError> {
        self.inner.set_submitted(external_id, submitted).await
    }
}
