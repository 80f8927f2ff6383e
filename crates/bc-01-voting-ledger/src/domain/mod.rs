//! Domain layer for the voting chaincode.

pub mod config;
pub mod entities;
pub mod errors;

pub use config::{CommitMode, ContractConfig, KeyLayout};
pub use entities::{Candidate, Vote, Voter};
pub use errors::{ContractError, StoreError};
