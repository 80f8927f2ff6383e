//! # Voting Ledger (bc-01)
//!
//! The voting chaincode: voter and candidate registration, vote casting and
//! read queries, executed directly against an ordered key-value world state.
//!
//! ## Role in System
//!
//! - **Single Source of Truth**: the ledger world state owns every Voter and
//!   Candidate record.
//! - **Invariant owner**: at-most-once voting and monotonic vote counts are
//!   enforced here, not in the gateway.
//!
//! ## Domain Invariants
//!
//! | Invariant | Description |
//! |-----------|-------------|
//! | Single Vote | `hasVoted` flips false→true at most once |
//! | Monotonic Count | `votes` only grows, by exactly 1 per accepted vote |
//! | Permissive Decode | absent fields decode to defaults, unknown fields are ignored |
//!
//! ## Write Ordering
//!
//! `CastVote` writes the candidate before the voter. Under
//! [`CommitMode::Sequential`] the two writes are separate `put`s: a failure
//! between them leaves an incremented candidate and an unvoted voter, and a
//! retry re-increments. [`CommitMode::Atomic`] submits both writes in one
//! version-checked [`WriteBatch`] instead.
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Records, key layout, contract configuration, errors
//! - `ports/` - Inbound API (`VotingApi`, `Chaincode`) and outbound SPI (`LedgerStateStore`)
//! - `adapters/` - In-memory world state
//! - `service.rs` - `VotingContract`, the state machine
//!
//! ## Usage
//!
//! ```ignore
//! use bc_01_voting_ledger::{ContractConfig, InMemoryStateStore, VotingApi, VotingContract};
//!
//! let contract = VotingContract::new(Arc::new(InMemoryStateStore::new()), ContractConfig::default());
//! contract.register_voter("v1", "Alice")?;
//! contract.register_candidate("c1", "Bob", "E1")?;
//! contract.cast_vote("v1", "c1")?;
//! assert_eq!(contract.get_vote_count("c1")?, 1);
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use adapters::InMemoryStateStore;
pub use domain::config::{CommitMode, ContractConfig, KeyLayout};
pub use domain::entities::{Candidate, Vote, Voter};
pub use domain::errors::{ContractError, StoreError};
pub use ports::inbound::{Chaincode, VotingApi};
pub use ports::outbound::{LedgerStateStore, ScanResult, Version, VersionedValue, WriteBatch};
pub use service::VotingContract;
