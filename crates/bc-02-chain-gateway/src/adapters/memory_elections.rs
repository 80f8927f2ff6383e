//! In-memory election catalog storage.

use crate::domain::election::{CandidateProfile, Election, NewElection};
use crate::domain::error::LocalStoreError;
use crate::ports::outbound::ElectionRepository;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;

#[derive(Default)]
struct Inner {
    elections: BTreeMap<u64, Election>,
    candidates: Vec<CandidateProfile>,
    last_election_id: u64,
    last_candidate_id: u64,
}

#[derive(Default)]
pub struct InMemoryElectionRepository {
    inner: RwLock<Inner>,
}

impl InMemoryElectionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ElectionRepository for InMemoryElectionRepository {
    async fn insert_election(&self, election: NewElection) -> Result<Election, LocalStoreError> {
        let mut inner = self.inner.write();
        inner.last_election_id += 1;
        let election = Election {
            id: inner.last_election_id,
            details: election,
        };
        inner.elections.insert(election.id, election.clone());
        Ok(election)
    }

    async fn list_elections(&self) -> Result<Vec<Election>, LocalStoreError> {
        Ok(self.inner.read().elections.values().cloned().collect())
    }

    async fn find_election(&self, id: u64) -> Result<Option<Election>, LocalStoreError> {
        Ok(self.inner.read().elections.get(&id).cloned())
    }

    async fn insert_candidates(
        &self,
        candidates: Vec<CandidateProfile>,
    ) -> Result<Vec<CandidateProfile>, LocalStoreError> {
        let mut inner = self.inner.write();
        let mut stored = Vec::with_capacity(candidates.len());
        for mut candidate in candidates {
            inner.last_candidate_id += 1;
            candidate.id = inner.last_candidate_id;
            inner.candidates.push(candidate.clone());
            stored.push(candidate);
        }
        Ok(stored)
    }

    async fn candidates_for(
        &self,
        election_id: u64,
    ) -> Result<Vec<CandidateProfile>, LocalStoreError> {
        Ok(self
            .inner
            .read()
            .candidates
            .iter()
            .filter(|c| c.election_id == election_id)
            .cloned()
            .collect())
    }
}
