//! # Inbound Ports (Driving Ports)
//!
//! Two views of the same contract: the typed [`VotingApi`] used in-process,
//! and the string-based [`Chaincode`] dispatch surface the ledger client
//! routes invocations to.

use crate::domain::entities::Candidate;
use crate::domain::errors::ContractError;

/// Typed voting operations.
pub trait VotingApi: Send + Sync {
    // === Registration ===

    /// Write a voter record unconditionally, overwriting any previous record.
    fn register_voter(&self, voter_id: &str, name: &str) -> Result<(), ContractError>;

    /// Write a candidate record with zero votes, overwriting any previous record.
    fn register_candidate(
        &self,
        candidate_id: &str,
        name: &str,
        election_id: &str,
    ) -> Result<(), ContractError>;

    // === Voting ===

    fn cast_vote(&self, voter_id: &str, candidate_id: &str) -> Result<(), ContractError>;

    // === Queries ===

    fn get_vote_count(&self, candidate_id: &str) -> Result<u64, ContractError>;

    /// Every record in the candidate range, decoded as a candidate.
    fn get_all_assets(&self) -> Result<Vec<Candidate>, ContractError>;

    /// Candidates of one election. An empty result is an error.
    fn get_candidates_by_election(&self, election_id: &str)
        -> Result<Vec<Candidate>, ContractError>;
}

/// Function-name dispatch, as executed by the ledger for each invocation.
pub trait Chaincode: Send + Sync {
    /// Contract name this chaincode is installed under.
    fn name(&self) -> &str;

    /// Execute `function` with positional string arguments and return the
    /// payload (empty for mutations).
    fn invoke(&self, function: &str, args: &[String]) -> Result<String, ContractError>;
}
