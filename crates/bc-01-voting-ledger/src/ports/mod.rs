//! Port definitions for the voting chaincode.

pub mod inbound;
pub mod outbound;

pub use inbound::{Chaincode, VotingApi};
pub use outbound::{LedgerStateStore, ScanResult, Version, VersionedValue, WriteBatch};
