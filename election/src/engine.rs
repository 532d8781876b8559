//! Core election engine: vote casting, candidate lifecycle, voter registry.

use std::sync::Arc;

use ballot_store::{BallotStore, Candidate, CascadeReport, VoteOutcome, Voter};
use ballot_types::{CandidateId, Role, Timestamp, VoterId};

use crate::draft::CandidateDraft;
use crate::error::ElectionError;

/// The election engine, generic over its storage backend.
///
/// Holds no mutable state of its own: every operation is one or more store
/// calls, and every multi-record change is a single [`BallotStore`] call.
/// Cheap to share behind an `Arc` across request handlers.
pub struct Election<S> {
    store: Arc<S>,
}

impl<S> Clone for Election<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: BallotStore> Election<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Cast `voter`'s vote for `candidate`.
    ///
    /// The eligibility check, the tally increment, and the ledger append
    /// happen in one store operation. Returns the candidate as written.
    pub fn cast_vote(
        &self,
        voter: &VoterId,
        candidate: &CandidateId,
        now: Timestamp,
    ) -> Result<Candidate, ElectionError> {
        match self.store.cast_vote(voter, candidate, now)? {
            VoteOutcome::Applied(updated) => {
                tracing::info!(
                    voter = %voter,
                    candidate = %updated.id,
                    pair = %updated.pair(),
                    votes = updated.votes,
                    "vote cast"
                );
                Ok(updated)
            }
            VoteOutcome::AlreadyVoted(existing) => {
                tracing::debug!(
                    voter = %voter,
                    candidate = %candidate,
                    pair = %existing.pair(),
                    previous = %existing.candidate,
                    "vote rejected: pair already voted"
                );
                Err(ElectionError::AlreadyVoted {
                    category: existing.category,
                    gender: existing.gender,
                })
            }
        }
    }

    /// Create a candidate from an admin's draft with a zero tally.
    pub fn create_candidate(
        &self,
        creator: Option<&VoterId>,
        draft: &CandidateDraft,
        now: Timestamp,
    ) -> Result<Candidate, ElectionError> {
        let valid = draft.validate()?;
        let id = CandidateId::generate().map_err(|e| ElectionError::Internal(e.to_string()))?;
        let candidate = Candidate {
            id,
            name: valid.name,
            gender: valid.gender,
            sport_category: valid.sport_category,
            photo: valid.photo,
            votes: 0,
            created_by: creator.cloned(),
            created_at: now,
        };
        self.store.insert_candidate(&candidate)?;
        tracing::info!(
            candidate = %candidate.id,
            name = %candidate.name,
            pair = %candidate.pair(),
            "candidate created"
        );
        Ok(candidate)
    }

    /// Delete a candidate and strip every ledger entry that names it.
    ///
    /// Voters who voted for the candidate may vote again in that pair.
    pub fn delete_candidate(&self, id: &CandidateId) -> Result<CascadeReport, ElectionError> {
        let report = self.store.remove_candidate(id)?;
        tracing::info!(
            candidate = %id,
            name = %report.candidate.name,
            ledger_entries_removed = report.ledger_entries_removed,
            voters_touched = report.voters_touched,
            "candidate deleted"
        );
        Ok(report)
    }

    /// Register a voter with an empty ledger.
    pub fn register_voter(
        &self,
        id: VoterId,
        username: &str,
        credential: &str,
        role: Role,
        now: Timestamp,
    ) -> Result<Voter, ElectionError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ElectionError::Validation("username is required".to_string()));
        }
        let voter = Voter::new(id, username, credential, role, now);
        self.store.insert_voter(&voter)?;
        tracing::info!(voter = %voter.id, role = voter.role.as_str(), "voter registered");
        Ok(voter)
    }

    /// A voter's profile and ledger.
    pub fn voter(&self, id: &VoterId) -> Result<Voter, ElectionError> {
        Ok(self.store.get_voter(id)?)
    }
}
