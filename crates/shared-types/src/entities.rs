//! # Invocation Entities
//!
//! The ledger invocation surface: a call names a channel, a contract
//! (chaincode), a function and an ordered list of string arguments. It is used
//! identically for state-mutating and read-only functions.

use crate::errors::ArgumentError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Chaincode function names exposed by the voting contract.
pub mod functions {
    pub const REGISTER_VOTER: &str = "RegisterVoter";
    pub const REGISTER_CANDIDATE: &str = "RegisterCandidate";
    pub const CAST_VOTE: &str = "CastVote";
    pub const GET_VOTE_COUNT: &str = "GetVoteCount";
    pub const GET_ALL_ASSETS: &str = "GetAllAssets";
    pub const GET_CANDIDATES_BY_ELECTION: &str = "GetCandidatesByElection";

    /// Functions that only read world state.
    pub const READ_ONLY: [&str; 3] = [GET_VOTE_COUNT, GET_ALL_ASSETS, GET_CANDIDATES_BY_ELECTION];

    /// Every function the contract dispatches.
    pub const ALL: [&str; 6] = [
        REGISTER_VOTER,
        REGISTER_CANDIDATE,
        CAST_VOTE,
        GET_VOTE_COUNT,
        GET_ALL_ASSETS,
        GET_CANDIDATES_BY_ELECTION,
    ];
}

/// Returns true if `function` never mutates world state.
pub fn is_read_only(function: &str) -> bool {
    functions::READ_ONLY.contains(&function)
}

/// One call against the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Invocation {
    /// Channel identifier.
    pub channel: String,
    /// Contract (chaincode) name.
    pub contract: String,
    /// Function name.
    pub function: String,
    /// Positional string arguments.
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(
        channel: impl Into<String>,
        contract: impl Into<String>,
        function: impl Into<String>,
        args: Vec<String>,
    ) -> Self {
        Self {
            channel: channel.into(),
            contract: contract.into(),
            function: function.into(),
            args,
        }
    }

    /// Returns the arguments if exactly `expected` were supplied.
    pub fn expect_args(&self, expected: usize) -> Result<&[String], ArgumentError> {
        expect_args(&self.args, expected)
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}::{}({})",
            self.channel,
            self.contract,
            self.function,
            self.args.len()
        )
    }
}

/// Checks a positional argument list length.
pub fn expect_args(args: &[String], expected: usize) -> Result<&[String], ArgumentError> {
    if args.len() != expected {
        return Err(ArgumentError::Count {
            expected,
            actual: args.len(),
        });
    }
    Ok(args)
}

/// Result of a committed (submitted) transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    /// Ledger-assigned transaction identifier.
    pub transaction_id: String,
    /// Payload returned by the chaincode.
    pub payload: String,
}

impl fmt::Display for TransactionReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Transaction ID : {} Response: {}",
            self.transaction_id, self.payload
        )
    }
}
