//! # Domain Errors
//!
//! Error types for the voting chaincode and its world-state store.
//!
//! Messages for the chaincode errors are part of the external contract: the
//! gateway forwards them verbatim to its callers.

use shared_types::{ArgumentError, Classify, ErrorKind};
use thiserror::Error;

/// Errors raised by a [`crate::LedgerStateStore`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// World-state keys must be non-empty.
    #[error("key must not be an empty string")]
    EmptyKey,

    /// A read recorded in a write batch is no longer current.
    #[error("version conflict on key {key}: read {expected:?}, current {actual:?}")]
    VersionConflict {
        key: String,
        expected: Option<u64>,
        actual: Option<u64>,
    },

    /// The backing store could not be reached or failed the operation.
    #[error("state store unavailable: {0}")]
    Unavailable(String),
}

impl Classify for StoreError {
    fn kind(&self) -> ErrorKind {
        match self {
            StoreError::EmptyKey => ErrorKind::Validation,
            StoreError::VersionConflict { .. } => ErrorKind::Conflict,
            StoreError::Unavailable(_) => ErrorKind::BackendUnavailable,
        }
    }
}

/// Errors returned by the voting chaincode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    #[error("voter {0} does not exist")]
    VoterNotFound(String),

    #[error("candidate {0} does not exist")]
    CandidateNotFound(String),

    #[error("no candidates found for election ID: {0}")]
    NoCandidatesForElection(String),

    #[error("voter {0} has already voted")]
    AlreadyVoted(String),

    #[error("electionID cannot be empty")]
    EmptyElectionId,

    #[error("failed to marshal {record}: {reason}")]
    Encode { record: &'static str, reason: String },

    #[error("failed to unmarshal {record}: {reason}")]
    Decode { record: &'static str, reason: String },

    /// World-state access failed; the store error is kept verbatim.
    #[error("failed to {operation} {record}: {source}")]
    Store {
        operation: &'static str,
        record: &'static str,
        source: StoreError,
    },

    #[error(transparent)]
    Arguments(#[from] ArgumentError),

    #[error("function {function} not found in contract {contract}")]
    UnknownFunction { function: String, contract: String },
}

impl ContractError {
    pub(crate) fn store(operation: &'static str, record: &'static str, source: StoreError) -> Self {
        ContractError::Store {
            operation,
            record,
            source,
        }
    }
}

impl Classify for ContractError {
    fn kind(&self) -> ErrorKind {
        match self {
            ContractError::VoterNotFound(_)
            | ContractError::CandidateNotFound(_)
            | ContractError::NoCandidatesForElection(_) => ErrorKind::NotFound,
            ContractError::AlreadyVoted(_) => ErrorKind::AlreadyVoted,
            ContractError::EmptyElectionId
            | ContractError::Arguments(_)
            | ContractError::UnknownFunction { .. } => ErrorKind::Validation,
            ContractError::Encode { .. } | ContractError::Decode { .. } => {
                ErrorKind::Serialization
            }
            ContractError::Store { source, .. } => source.kind(),
        }
    }
}
