//! # Chain Gateway (bc-02)
//!
//! Front-line gateway between callers and the voting ledger: read queries go
//! through a TTL cache, voter registration is mirrored into a local store, and
//! every ledger call runs under a deadline.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │                      CHAIN GATEWAY (bc-02)                         │
//! │                                                                    │
//! │   invoke(function, args)            query(ch, cc, function, args)  │
//! │          │                                      │                  │
//! │  ┌───────┴────────────┐             ┌───────────┴────────────┐     │
//! │  │ RegistrationProxy  │             │  CachedQueryExecutor   │     │
//! │  │ (RegisterVoter ──▶ │             │  hit ──▶ CacheBackend  │     │
//! │  │  RegistrationStore)│             │  miss ─▶ LedgerQuery-  │     │
//! │  └───────┬────────────┘             │          Executor      │     │
//! │          │                          └───────────┬────────────┘     │
//! │          └──────────────┬───────────────────────┘                  │
//! │                 ┌───────┴────────┐                                 │
//! │                 │ TimedLedger-   │  submit/evaluate deadlines      │
//! │                 │ Client         │                                 │
//! │                 └───────┬────────┘                                 │
//! └─────────────────────────┼──────────────────────────────────────────┘
//!                           ▼
//!                 bc-01 VotingContract (via LedgerClient)
//! ```
//!
//! ## Consistency Model
//!
//! | Path | Guarantee |
//! |------|-----------|
//! | Query | May be stale for up to the cache TTL; writes never invalidate |
//! | RegisterVoter (`Eager`) | Local record may claim a registration the ledger rejected |
//! | RegisterVoter (`Saga`) | Local record stays pending until the ledger accepts |
//! | Ledger timeout | `BackendUnavailable`, never retried |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Configuration, errors, registration and election records
//! - `ports/` - `GatewayApi`, `QueryExecutor` and the outbound SPI
//! - `adapters/` - In-process ledger, deadline decorator, in-memory stores
//! - `query/` - Direct and cached query executors
//! - `proxy.rs` - Registration proxy
//! - `catalog.rs` - Election catalog
//! - `service.rs` - `TransactionGateway` and in-memory wiring
//!
//! ## Usage
//!
//! ```ignore
//! use bc_02_chain_gateway::{GatewayApi, GatewayConfig, InMemoryDeployment};
//!
//! let mut config = GatewayConfig::load("gateway.toml")?;
//! config.apply_env_overrides()?;
//! let deployment = InMemoryDeployment::new(&config)?;
//!
//! deployment.gateway.invoke("RegisterVoter", &["2001".into(), "Alice".into()]).await?;
//! let count = deployment
//!     .gateway
//!     .query("mychannel", "basic", "GetVoteCount", &["c1".into()])
//!     .await?;
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod catalog;
pub mod domain;
pub mod ports;
pub mod proxy;
pub mod query;
pub mod service;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use adapters::{
    InMemoryCache, InMemoryElectionRepository, InMemoryRegistrationStore, InProcessLedger,
    TimedLedgerClient,
};
pub use catalog::ElectionCatalog;
pub use domain::{
    CacheConfig, CacheError, CandidateProfile, ConfigError, Election, GatewayConfig,
    GatewayError, LedgerConfig, LedgerError, LocalStoreError, NewElection, NewRegistration,
    RegistrationConfig, RegistrationMode, RegistrationRecord,
};
pub use ports::{
    CacheBackend, ElectionRepository, GatewayApi, LedgerClient, QueryExecutor, RegistrationStore,
};
pub use proxy::RegistrationProxy;
pub use query::{cache_key, CachedQueryExecutor, LedgerQueryExecutor};
pub use service::{InMemoryDeployment, TransactionGateway};
