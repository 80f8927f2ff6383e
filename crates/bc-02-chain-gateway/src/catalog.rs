//! Off-ledger election catalog.
//!
//! Elections and candidate profiles live in the gateway's local database.
//! The ledger only sees the `electionID` stamped on each on-chain candidate.

use crate::domain::election::{CandidateProfile, Election, NewElection};
use crate::domain::error::GatewayError;
use crate::ports::outbound::ElectionRepository;
use std::sync::Arc;
use tracing::{info, instrument};

pub struct ElectionCatalog {
    repository: Arc<dyn ElectionRepository>,
}

impl ElectionCatalog {
    pub fn new(repository: Arc<dyn ElectionRepository>) -> Self {
        Self { repository }
    }

    #[instrument(skip_all, fields(title = %election.title))]
    pub async fn register_election(&self, election: NewElection) -> Result<Election, GatewayError> {
        election.validate()?;
        let election = self.repository.insert_election(election).await?;
        info!(election_id = election.id, "Election registered");
        Ok(election)
    }

    pub async fn list_elections(&self) -> Result<Vec<Election>, GatewayError> {
        Ok(self.repository.list_elections().await?)
    }

    pub async fn get_election(&self, id: u64) -> Result<Election, GatewayError> {
        self.repository
            .find_election(id)
            .await?
            .ok_or(GatewayError::ElectionNotFound(id))
    }

    /// Store candidate profiles under an existing election.
    #[instrument(skip(self, candidates), fields(count = candidates.len()))]
    pub async fn register_candidates(
        &self,
        election_id: u64,
        candidates: Vec<CandidateProfile>,
    ) -> Result<Vec<CandidateProfile>, GatewayError> {
        let election = self.get_election(election_id).await?;

        let candidates = candidates
            .into_iter()
            .map(|candidate| CandidateProfile {
                election_id: election.id,
                ..candidate
            })
            .collect();

        let stored = self.repository.insert_candidates(candidates).await?;
        info!(stored = stored.len(), "Candidates registered");
        Ok(stored)
    }

    /// Profiles registered for an election. Unlike the ledger query, an
    /// empty result is not an error.
    pub async fn candidates(&self, election_id: u64) -> Result<Vec<CandidateProfile>, GatewayError> {
        Ok(self.repository.candidates_for(election_id).await?)
    }
}
