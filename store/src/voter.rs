//! Voter records, their ledgers, and the voter storage trait.

use ballot_types::{CandidateId, Gender, Role, SportCategory, Timestamp, VoterId, VotingPair};
use serde::{Deserialize, Serialize};

use crate::candidate::Candidate;
use crate::StoreError;

/// One cast vote. Created only by a successful vote and never mutated;
/// removed only when its candidate is deleted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub category: SportCategory,
    pub gender: Gender,
    pub candidate: CandidateId,
    pub voted_at: Timestamp,
}

impl LedgerEntry {
    pub fn pair(&self) -> VotingPair {
        VotingPair::new(self.category, self.gender)
    }
}

/// A registered voter and the ledger of pairs they have voted on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Voter {
    pub id: VoterId,
    pub username: String,
    /// Hashed secret issued by the authentication service. Opaque here.
    pub credential: String,
    pub role: Role,
    /// At most one entry per (category, gender) pair.
    pub voted_categories: Vec<LedgerEntry>,
    pub created_at: Timestamp,
}

impl Voter {
    pub fn new(
        id: VoterId,
        username: impl Into<String>,
        credential: impl Into<String>,
        role: Role,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            credential: credential.into(),
            role,
            voted_categories: Vec::new(),
            created_at,
        }
    }

    pub fn ledger_entry_for(&self, pair: VotingPair) -> Option<&LedgerEntry> {
        self.voted_categories.iter().find(|e| e.pair() == pair)
    }

    pub fn has_voted(&self, pair: VotingPair) -> bool {
        self.ledger_entry_for(pair).is_some()
    }

    /// Append a ledger entry for `candidate` unless the voter already holds
    /// one for the candidate's pair, in which case the existing entry is
    /// returned and the ledger is left untouched.
    pub fn record_vote(&mut self, candidate: &Candidate, at: Timestamp) -> Result<(), LedgerEntry> {
        if let Some(existing) = self.ledger_entry_for(candidate.pair()) {
            return Err(existing.clone());
        }
        self.voted_categories.push(LedgerEntry {
            category: candidate.sport_category,
            gender: candidate.gender,
            candidate: candidate.id,
            voted_at: at,
        });
        Ok(())
    }

    /// Drop every entry naming `candidate`. Returns how many were removed.
    pub fn strip_candidate(&mut self, candidate: &CandidateId) -> usize {
        let before = self.voted_categories.len();
        self.voted_categories.retain(|e| e.candidate != *candidate);
        before - self.voted_categories.len()
    }
}

/// Trait for voter storage operations.
pub trait VoterStore {
    /// Register a voter. Fails with [`StoreError::Duplicate`] if the id exists.
    fn insert_voter(&self, voter: &Voter) -> Result<(), StoreError>;

    fn get_voter(&self, id: &VoterId) -> Result<Voter, StoreError>;

    fn voter_exists(&self, id: &VoterId) -> Result<bool, StoreError>;

    fn iter_voters(&self) -> Result<Vec<Voter>, StoreError>;

    fn voter_count(&self) -> Result<u64, StoreError> {
        self.iter_voters().map(|v| v.len() as u64)
    }
}
