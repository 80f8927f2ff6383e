//! Contract configuration: key layout and commit strategy.
//!
//! Both defaults preserve the observable behaviour of the deployed chaincode.
//! The alternatives are opt-in and change what other participants observe.

use serde::{Deserialize, Serialize};

/// Separator between namespace and id in [`KeyLayout::Namespaced`].
pub const NAMESPACE_SEPARATOR: char = '~';

const VOTER_NAMESPACE: &str = "voter";
const CANDIDATE_NAMESPACE: &str = "candidate";

/// How record ids map to world-state keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyLayout {
    /// Voter and candidate ids share one untagged namespace. A voter id equal
    /// to a candidate id silently overwrites or mis-decodes, and
    /// `GetAllAssets` returns voters as zero-valued candidates.
    #[default]
    Flat,
    /// Keys are prefixed with `voter~` / `candidate~`.
    Namespaced,
}

impl KeyLayout {
    pub fn voter_key(&self, voter_id: &str) -> String {
        match self {
            KeyLayout::Flat => voter_id.to_string(),
            KeyLayout::Namespaced => {
                format!("{VOTER_NAMESPACE}{NAMESPACE_SEPARATOR}{voter_id}")
            }
        }
    }

    pub fn candidate_key(&self, candidate_id: &str) -> String {
        match self {
            KeyLayout::Flat => candidate_id.to_string(),
            KeyLayout::Namespaced => {
                format!("{CANDIDATE_NAMESPACE}{NAMESPACE_SEPARATOR}{candidate_id}")
            }
        }
    }

    /// `(start, end)` range covering every candidate record. Empty bounds
    /// mean unbounded, so the flat layout scans the whole keyspace.
    pub fn candidate_range(&self) -> (String, String) {
        match self {
            KeyLayout::Flat => (String::new(), String::new()),
            // '~' is 0x7E, so every "candidate~..." key sorts below "candidate\x7f".
            KeyLayout::Namespaced => (
                format!("{CANDIDATE_NAMESPACE}{NAMESPACE_SEPARATOR}"),
                format!("{CANDIDATE_NAMESPACE}\u{7f}"),
            ),
        }
    }
}

/// How `CastVote` persists its two writes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitMode {
    /// Candidate `put`, then voter `put`. A failure in between leaves an
    /// over-countable state; concurrent votes by one voter can both pass the
    /// `hasVoted` check.
    #[default]
    Sequential,
    /// Both writes in one [`crate::WriteBatch`] guarded by the versions of the
    /// two reads. All or nothing; stale reads fail with a conflict.
    Atomic,
}

/// Voting contract configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractConfig {
    /// Contract (chaincode) name reported in dispatch errors.
    pub name: String,
    pub key_layout: KeyLayout,
    pub commit_mode: CommitMode,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            name: "basic".to_string(),
            key_layout: KeyLayout::Flat,
            commit_mode: CommitMode::Sequential,
        }
    }
}

impl ContractConfig {
    pub fn with_key_layout(mut self, key_layout: KeyLayout) -> Self {
        self.key_layout = key_layout;
        self
    }

    pub fn with_commit_mode(mut self, commit_mode: CommitMode) -> Self {
        self.commit_mode = commit_mode;
        self
    }
}
