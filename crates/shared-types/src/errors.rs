//! # Error Types
//!
//! Defines the error classification used across subsystems.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Closed set of failure categories surfaced to the HTTP layer.
///
/// Subsystem errors carry their own messages; the kind is what callers
/// translate into transport-level responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Missing voter/candidate/election, or an empty election query.
    NotFound,
    /// The voter already cast a vote.
    AlreadyVoted,
    /// The external identifier is already registered locally.
    AlreadyRegistered,
    /// A required field is empty or an argument list is malformed.
    Validation,
    /// Record encoding or decoding failed.
    Serialization,
    /// Cache, ledger or local-store transport failure (including timeouts).
    BackendUnavailable,
    /// An atomic commit observed a stale read.
    Conflict,
}

impl ErrorKind {
    /// Stable lowercase label, used in logs and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::AlreadyVoted => "already_voted",
            ErrorKind::AlreadyRegistered => "already_registered",
            ErrorKind::Validation => "validation",
            ErrorKind::Serialization => "serialization",
            ErrorKind::BackendUnavailable => "backend_unavailable",
            ErrorKind::Conflict => "conflict",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Implemented by every subsystem error so callers can classify failures.
pub trait Classify {
    /// The category of this error.
    fn kind(&self) -> ErrorKind;
}

/// Argument-list errors raised when decoding an [`crate::Invocation`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    /// Wrong number of positional arguments.
    #[error("incorrect number of arguments: expected {expected}, got {actual}")]
    Count { expected: usize, actual: usize },
}

impl Classify for ArgumentError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}
