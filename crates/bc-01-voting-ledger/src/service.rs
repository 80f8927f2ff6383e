//! # Voting Contract
//!
//! The voting state machine. Every operation runs directly against the
//! world-state store; there is no in-process lock around the
//! read-modify-write of `cast_vote`.
//!
//! ## CastVote Steps
//!
//! 1. Read voter, `VoterNotFound` if absent
//! 2. `AlreadyVoted` if `hasVoted`, nothing else touched
//! 3. Read candidate, `CandidateNotFound` if absent
//! 4. Persist candidate with `votes + 1`
//! 5. Persist voter with `hasVoted = true`
//!
//! Steps 4 and 5 are two `put`s under [`CommitMode::Sequential`] and one
//! version-checked batch under [`CommitMode::Atomic`].

use crate::domain::config::{CommitMode, ContractConfig};
use crate::domain::entities::{Candidate, Voter};
use crate::domain::errors::ContractError;
use crate::ports::inbound::{Chaincode, VotingApi};
use crate::ports::outbound::{LedgerStateStore, VersionedValue, WriteBatch};

use serde::de::DeserializeOwned;
use serde::Serialize;
use shared_types::{expect_args, functions};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The voting chaincode bound to one world-state store.
pub struct VotingContract<S: LedgerStateStore + ?Sized> {
    store: Arc<S>,
    config: ContractConfig,
}

impl<S: LedgerStateStore + ?Sized> VotingContract<S> {
    pub fn new(store: Arc<S>, config: ContractConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &ContractConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    fn read(
        &self,
        record: &'static str,
        key: &str,
    ) -> Result<Option<VersionedValue>, ContractError> {
        self.store
            .get_versioned(key)
            .map_err(|e| ContractError::store("read", record, e))
    }

    fn write(&self, record: &'static str, key: &str, value: Vec<u8>) -> Result<(), ContractError> {
        self.store
            .put(key, value)
            .map_err(|e| ContractError::store("update", record, e))
    }

    fn scan_candidates(&self) -> Result<Vec<Candidate>, ContractError> {
        let (start, end) = self.config.key_layout.candidate_range();
        let entries = self
            .store
            .range_scan(&start, &end)
            .map_err(|e| ContractError::store("read from", "world state", e))?;

        entries
            .iter()
            .map(|(_, value)| decode::<Candidate>("candidate", value))
            .collect()
    }

    fn commit_vote(
        &self,
        voter_key: &str,
        voter_version: u64,
        voter: &Voter,
        candidate_key: &str,
        candidate_version: u64,
        candidate: &Candidate,
    ) -> Result<(), ContractError> {
        match self.config.commit_mode {
            CommitMode::Sequential => {
                self.write("candidate", candidate_key, encode("candidate", candidate)?)?;
                self.write("voter", voter_key, encode("voter", voter)?)
            }
            CommitMode::Atomic => {
                let mut batch = WriteBatch::new();
                batch
                    .expect(voter_key, Some(voter_version))
                    .expect(candidate_key, Some(candidate_version))
                    .put(candidate_key, encode("candidate", candidate)?)
                    .put(voter_key, encode("voter", voter)?);
                self.store
                    .commit(batch)
                    .map_err(|e| ContractError::store("commit", "vote", e))
            }
        }
    }
}

fn encode<T: Serialize>(record: &'static str, value: &T) -> Result<Vec<u8>, ContractError> {
    serde_json::to_vec(value).map_err(|e| ContractError::Encode {
        record,
        reason: e.to_string(),
    })
}

fn decode<T: DeserializeOwned>(record: &'static str, bytes: &[u8]) -> Result<T, ContractError> {
    serde_json::from_slice(bytes).map_err(|e| ContractError::Decode {
        record,
        reason: e.to_string(),
    })
}

fn to_json<T: Serialize>(record: &'static str, value: &T) -> Result<String, ContractError> {
    serde_json::to_string(value).map_err(|e| ContractError::Encode {
        record,
        reason: e.to_string(),
    })
}

impl<S: LedgerStateStore + ?Sized> VotingApi for VotingContract<S> {
    fn register_voter(&self, voter_id: &str, name: &str) -> Result<(), ContractError> {
        let voter = Voter::new(voter_id, name);
        let key = self.config.key_layout.voter_key(voter_id);
        self.store
            .put(&key, encode("voter", &voter)?)
            .map_err(|e| ContractError::store("register", "voter", e))?;
        debug!(voter_id, "Voter registered");
        Ok(())
    }

    fn register_candidate(
        &self,
        candidate_id: &str,
        name: &str,
        election_id: &str,
    ) -> Result<(), ContractError> {
        let candidate = Candidate::new(candidate_id, name, election_id);
        let key = self.config.key_layout.candidate_key(candidate_id);
        self.store
            .put(&key, encode("candidate", &candidate)?)
            .map_err(|e| ContractError::store("register", "candidate", e))?;
        debug!(candidate_id, election_id, "Candidate registered");
        Ok(())
    }

    fn cast_vote(&self, voter_id: &str, candidate_id: &str) -> Result<(), ContractError> {
        let layout = self.config.key_layout;

        let voter_key = layout.voter_key(voter_id);
        let voter_entry = self
            .read("voter", &voter_key)?
            .ok_or_else(|| ContractError::VoterNotFound(voter_id.to_string()))?;
        let mut voter: Voter = decode("voter", &voter_entry.value)?;

        if voter.has_voted {
            warn!(voter_id, candidate_id, "Rejected repeat vote");
            return Err(ContractError::AlreadyVoted(voter_id.to_string()));
        }

        let candidate_key = layout.candidate_key(candidate_id);
        let candidate_entry = self
            .read("candidate", &candidate_key)?
            .ok_or_else(|| ContractError::CandidateNotFound(candidate_id.to_string()))?;
        let mut candidate: Candidate = decode("candidate", &candidate_entry.value)?;

        candidate.votes += 1;
        voter.has_voted = true;

        self.commit_vote(
            &voter_key,
            voter_entry.version,
            &voter,
            &candidate_key,
            candidate_entry.version,
            &candidate,
        )?;

        info!(
            voter_id,
            candidate_id,
            votes = candidate.votes,
            commit_mode = ?self.config.commit_mode,
            "Vote cast"
        );
        Ok(())
    }

    fn get_vote_count(&self, candidate_id: &str) -> Result<u64, ContractError> {
        let key = self.config.key_layout.candidate_key(candidate_id);
        let entry = self
            .read("candidate", &key)?
            .ok_or_else(|| ContractError::CandidateNotFound(candidate_id.to_string()))?;
        let candidate: Candidate = decode("candidate", &entry.value)?;
        Ok(candidate.votes)
    }

    fn get_all_assets(&self) -> Result<Vec<Candidate>, ContractError> {
        self.scan_candidates()
    }

    fn get_candidates_by_election(
        &self,
        election_id: &str,
    ) -> Result<Vec<Candidate>, ContractError> {
        if election_id.is_empty() {
            return Err(ContractError::EmptyElectionId);
        }

        let candidates: Vec<Candidate> = self
            .scan_candidates()?
            .into_iter()
            .filter(|c| c.election_id == election_id)
            .collect();

        if candidates.is_empty() {
            return Err(ContractError::NoCandidatesForElection(
                election_id.to_string(),
            ));
        }
        Ok(candidates)
    }
}

impl<S: LedgerStateStore + ?Sized> Chaincode for VotingContract<S> {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn invoke(&self, function: &str, args: &[String]) -> Result<String, ContractError> {
        match function {
            functions::REGISTER_VOTER => {
                let args = expect_args(args, 2)?;
                self.register_voter(&args[0], &args[1])?;
                Ok(String::new())
            }
            functions::REGISTER_CANDIDATE => {
                let args = expect_args(args, 3)?;
                self.register_candidate(&args[0], &args[1], &args[2])?;
                Ok(String::new())
            }
            functions::CAST_VOTE => {
                let args = expect_args(args, 2)?;
                self.cast_vote(&args[0], &args[1])?;
                Ok(String::new())
            }
            functions::GET_VOTE_COUNT => {
                let args = expect_args(args, 1)?;
                Ok(self.get_vote_count(&args[0])?.to_string())
            }
            functions::GET_ALL_ASSETS => {
                expect_args(args, 0)?;
                to_json("candidates", &self.get_all_assets()?)
            }
            functions::GET_CANDIDATES_BY_ELECTION => {
                let args = expect_args(args, 1)?;
                to_json("candidates", &self.get_candidates_by_election(&args[0])?)
            }
            other => Err(ContractError::UnknownFunction {
                function: other.to_string(),
                contract: self.config.name.clone(),
            }),
        }
    }
}
