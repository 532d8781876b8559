//! Atomic multi-record operations: casting a vote and removing a candidate.
//!
//! Both operations touch more than one record, so backends must run each
//! of them as a single indivisible unit. A backend with only per-record
//! atomicity cannot implement this trait correctly.

use ballot_types::{CandidateId, Timestamp, VoterId};
use serde::Serialize;

use crate::candidate::{Candidate, CandidateStore};
use crate::voter::{LedgerEntry, VoterStore};
use crate::StoreError;

/// Result of [`BallotStore::cast_vote`], decided inside the store operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VoteOutcome {
    /// The tally was incremented and the ledger entry appended.
    /// Carries the candidate as written.
    Applied(Candidate),
    /// The voter already holds an entry for the candidate's pair.
    /// Nothing was written.
    AlreadyVoted(LedgerEntry),
}

/// What a candidate removal touched.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CascadeReport {
    pub candidate: Candidate,
    pub ledger_entries_removed: u64,
    pub voters_touched: u64,
}

pub trait BallotStore: CandidateStore + VoterStore {
    /// Check the voter's ledger for the candidate's pair and, if it is free,
    /// increment the candidate's tally and append a ledger entry stamped
    /// `at`. Check and writes happen as one unit.
    ///
    /// Fails with [`StoreError::NotFound`] when either record is missing.
    fn cast_vote(
        &self,
        voter: &VoterId,
        candidate: &CandidateId,
        at: Timestamp,
    ) -> Result<VoteOutcome, StoreError>;

    /// Delete a candidate and strip every ledger entry naming it, as one unit.
    fn remove_candidate(&self, id: &CandidateId) -> Result<CascadeReport, StoreError>;
}
