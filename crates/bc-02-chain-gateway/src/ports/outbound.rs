//! # Outbound Ports (Driven Ports)
//!
//! | Port | Production | Testing |
//! |------|------------|---------|
//! | `LedgerClient` | Fabric gateway client | `InProcessLedger` |
//! | `CacheBackend` | Redis | `InMemoryCache` |
//! | `RegistrationStore` | Postgres | `InMemoryRegistrationStore` |
//! | `ElectionRepository` | Postgres | `InMemoryElectionRepository` |

use crate::domain::election::{CandidateProfile, Election, NewElection};
use crate::domain::error::{CacheError, LedgerError, LocalStoreError};
use crate::domain::registration::{NewRegistration, RegistrationRecord};
use async_trait::async_trait;
use shared_types::{Invocation, TransactionReceipt};
use std::sync::Arc;
use std::time::Duration;

/// Ledger invocation surface.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Endorse and commit a transaction.
    async fn submit(&self, invocation: &Invocation) -> Result<TransactionReceipt, LedgerError>;

    /// Run a read-only function without committing anything.
    async fn evaluate(&self, invocation: &Invocation) -> Result<String, LedgerError>;
}

#[async_trait]
impl<L: LedgerClient + ?Sized> LedgerClient for Arc<L> {
    async fn submit(&self, invocation: &Invocation) -> Result<TransactionReceipt, LedgerError> {
        (**self).submit(invocation).await
    }

    async fn evaluate(&self, invocation: &Invocation) -> Result<String, LedgerError> {
        (**self).evaluate(invocation).await
    }
}

/// Key-value cache with per-entry TTL.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;
}

#[async_trait]
impl<C: CacheBackend + ?Sized> CacheBackend for Arc<C> {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        (**self).set(key, value, ttl).await
    }
}

/// Off-ledger registration records, unique by external id.
#[async_trait]
pub trait RegistrationStore: Send + Sync {
    async fn find_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<RegistrationRecord>, LocalStoreError>;

    /// Store a new record and assign its id.
    ///
    /// Fails with [`LocalStoreError::Duplicate`] if the external id exists.
    async fn insert(
        &self,
        registration: NewRegistration,
    ) -> Result<RegistrationRecord, LocalStoreError>;

    /// Set `registered = true` on an existing record.
    async fn mark_registered(&self, external_id: &str) -> Result<(), LocalStoreError>;

    /// Set or clear the in-flight marker on an existing record.
    async fn set_submitted(&self, external_id: &str, submitted: bool)
        -> Result<(), LocalStoreError>;
}

/// Off-ledger election catalog.
#[async_trait]
pub trait ElectionRepository: Send + Sync {
    async fn insert_election(&self, election: NewElection) -> Result<Election, LocalStoreError>;

    async fn list_elections(&self) -> Result<Vec<Election>, LocalStoreError>;

    async fn find_election(&self, id: u64) -> Result<Option<Election>, LocalStoreError>;

    /// Store candidate profiles, assigning ids.
    async fn insert_candidates(
        &self,
        candidates: Vec<CandidateProfile>,
    ) -> Result<Vec<CandidateProfile>, LocalStoreError>;

    async fn candidates_for(&self, election_id: u64)
        -> Result<Vec<CandidateProfile>, LocalStoreError>;
}
