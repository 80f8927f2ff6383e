//! Gateway error types.
//!
//! Every error maps onto [`ErrorKind`] through [`Classify`]. Ledger and local
//! store messages are kept verbatim; the gateway never rewrites them.

use bc_01_voting_ledger::ContractError;
use shared_types::{Classify, ErrorKind};
use std::time::Duration;
use thiserror::Error;

/// Errors from the ledger invocation surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The chaincode rejected the invocation.
    #[error(transparent)]
    Contract(#[from] ContractError),

    /// No contract is deployed under this name on this channel.
    #[error("contract {contract} not found on channel {channel}")]
    UnknownContract { channel: String, contract: String },

    /// Evaluation is restricted to read-only functions.
    #[error("function {0} mutates world state and cannot be evaluated")]
    NotReadOnly(String),

    /// The ledger peer could not be reached.
    #[error("ledger unavailable: {0}")]
    Unavailable(String),

    /// The call did not complete within its deadline.
    #[error("ledger {operation} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },
}

impl LedgerError {
    /// Whether the ledger may have committed the call despite the error.
    pub fn is_indeterminate(&self) -> bool {
        matches!(self, LedgerError::Unavailable(_) | LedgerError::Timeout { .. })
    }
}

impl Classify for LedgerError {
    fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::Contract(e) => e.kind(),
            LedgerError::UnknownContract { .. } => ErrorKind::NotFound,
            LedgerError::NotReadOnly(_) => ErrorKind::Validation,
            LedgerError::Unavailable(_) | LedgerError::Timeout { .. } => {
                ErrorKind::BackendUnavailable
            }
        }
    }
}

/// Errors from a cache backend. Never surfaced to gateway callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),

    #[error("cache {operation} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },
}

/// Errors from the off-ledger stores (registrations, elections).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocalStoreError {
    /// Unique constraint violated on insert.
    #[error("record with key {0} already exists")]
    Duplicate(String),

    #[error("record with key {0} not found")]
    NotFound(String),

    #[error("local store unavailable: {0}")]
    Unavailable(String),
}

impl Classify for LocalStoreError {
    fn kind(&self) -> ErrorKind {
        match self {
            LocalStoreError::Duplicate(_) => ErrorKind::AlreadyRegistered,
            LocalStoreError::NotFound(_) => ErrorKind::NotFound,
            LocalStoreError::Unavailable(_) => ErrorKind::BackendUnavailable,
        }
    }
}

/// Errors returned to gateway callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("{0}")]
    Validation(String),

    #[error("user with IDNP {0} already registered")]
    AlreadyRegistered(String),

    /// A ledger call for this id may have committed; it is not repeated.
    #[error("registration of IDNP {0} awaits ledger confirmation")]
    RegistrationUnconfirmed(String),

    #[error("election with id {0} not found")]
    ElectionNotFound(u64),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("local store error: {0}")]
    LocalStore(#[from] LocalStoreError),
}

impl GatewayError {
    pub fn validation(message: impl Into<String>) -> Self {
        GatewayError::Validation(message.into())
    }
}

impl Classify for GatewayError {
    fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::Validation(_) => ErrorKind::Validation,
            GatewayError::AlreadyRegistered(_) => ErrorKind::AlreadyRegistered,
            GatewayError::RegistrationUnconfirmed(_) => ErrorKind::Conflict,
            GatewayError::ElectionNotFound(_) => ErrorKind::NotFound,
            GatewayError::Ledger(e) => e.kind(),
            GatewayError::LocalStore(e) => e.kind(),
        }
    }
}

impl From<ContractError> for GatewayError {
    fn from(e: ContractError) -> Self {
        GatewayError::Ledger(LedgerError::Contract(e))
    }
}
