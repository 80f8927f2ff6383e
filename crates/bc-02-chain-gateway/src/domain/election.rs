//! Off-ledger election catalog records.
//!
//! Dates are stored verbatim; nothing here evaluates them.

use crate::domain::error::GatewayError;
use serde::{Deserialize, Serialize};

/// Election details as submitted by an administrator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewElection {
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub election_type: String,
    pub start_date: String,
    pub end_date: String,
    pub number_of_auth_attempts: String,
    pub number_of_candidates: String,
    pub number_of_selection: String,
    pub auth_method: String,
}

impl NewElection {
    pub fn validate(&self) -> Result<(), GatewayError> {
        let required = [
            ("title", &self.title),
            ("type", &self.election_type),
            ("startDate", &self.start_date),
            ("endDate", &self.end_date),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(GatewayError::validation(format!(
                    "election {field} cannot be empty"
                )));
            }
        }
        Ok(())
    }
}

/// A stored election.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Election {
    pub id: u64,
    #[serde(flatten)]
    pub details: NewElection,
}

/// Candidate profile shown by the front end. Distinct from the ledger's
/// `Candidate`, which only carries the tally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CandidateProfile {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    pub party: String,
    pub photo: String,
    #[serde(rename = "electionID")]
    pub election_id: u64,
}
