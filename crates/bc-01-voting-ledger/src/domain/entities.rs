//! # Ledger Records
//!
//! World-state records of the voting chaincode. Field names on the wire are
//! fixed (`id`, `name`, `hasVoted`, `electionID`, `votes`) so records written
//! by other ledger participants decode unchanged.
//!
//! ## Permissive Decoding
//!
//! Both record types default every absent field and ignore unknown ones. With
//! the flat key layout a Voter read as a Candidate therefore yields a
//! Candidate with an empty `electionID` and zero votes rather than an error.

use serde::{Deserialize, Serialize};

/// A registered voter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Voter {
    pub id: String,
    pub name: String,
    #[serde(rename = "hasVoted")]
    pub has_voted: bool,
}

impl Voter {
    /// A freshly registered voter who has not voted.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            has_voted: false,
        }
    }
}

/// A candidate standing in one election.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    #[serde(rename = "electionID")]
    pub election_id: String,
    pub votes: u64,
}

impl Candidate {
    /// A freshly registered candidate with zero votes.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        election_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            election_id: election_id.into(),
            votes: 0,
        }
    }
}

/// One cast-vote request. Never persisted: its effect is the paired mutation
/// of one [`Voter`] and one [`Candidate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    #[serde(rename = "VoterID")]
    pub voter_id: String,
    #[serde(rename = "candidateID")]
    pub candidate_id: String,
}

impl Vote {
    pub fn new(voter_id: impl Into<String>, candidate_id: impl Into<String>) -> Self {
        Self {
            voter_id: voter_id.into(),
            candidate_id: candidate_id.into(),
        }
    }
}
