//! Nullable store: thread-safe in-memory ballot storage for testing.
//!
//! All records live behind one mutex, so the multi-record operations of
//! [`BallotStore`] are atomic the same way a single LMDB write transaction
//! is.

use ballot_store::{
    BallotStore, Candidate, CandidateStore, CascadeReport, MetaStore, StoreError, VoteOutcome,
    Voter, VoterStore,
};
use ballot_types::{CandidateId, Timestamp, VoterId};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

#[derive(Default)]
struct State {
    candidates: BTreeMap<CandidateId, Candidate>,
    candidate_keys: BTreeMap<Vec<u8>, CandidateId>,
    voters: BTreeMap<VoterId, Voter>,
    schema_version: u32,
}

/// An in-memory candidate + voter store for testing.
/// Thread-safe for use with tokio's multi-threaded runtime.
#[derive(Default)]
pub struct NullStore {
    state: Mutex<State>,
    unavailable: AtomicBool,
}

impl NullStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail with [`StoreError::Backend`],
    /// simulating a lost database.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Overwrite a candidate's tally without touching any ledger.
    /// Only useful for exercising audits.
    pub fn force_tally(&self, id: &CandidateId, votes: u64) {
        if let Some(c) = self.state.lock().unwrap().candidates.get_mut(id) {
            c.votes = votes;
        }
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("store unavailable".to_string()));
        }
        Ok(())
    }
}

impl CandidateStore for NullStore {
    fn insert_candidate(&self, candidate: &Candidate) -> Result<(), StoreError> {
        self.check()?;
        let mut state = self.state.lock().unwrap();
        let key = candidate.identity_key();
        if state.candidates.contains_key(&candidate.id) {
            return Err(StoreError::Duplicate {
                kind: "candidate",
                key: candidate.id.to_string(),
            });
        }
        if state.candidate_keys.contains_key(&key) {
            return Err(StoreError::Duplicate {
                kind: "candidate",
                key: candidate.name.clone(),
            });
        }
        state.candidate_keys.insert(key, candidate.id);
        state.candidates.insert(candidate.id, candidate.clone());
        Ok(())
    }

    fn get_candidate(&self, id: &CandidateId) -> Result<Candidate, StoreError> {
        self.check()?;
        self.state
            .lock()
            .unwrap()
            .candidates
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::candidate_not_found(id))
    }

    fn candidate_exists(&self, id: &CandidateId) -> Result<bool, StoreError> {
        self.check()?;
        Ok(self.state.lock().unwrap().candidates.contains_key(id))
    }

    fn iter_candidates(&self) -> Result<Vec<Candidate>, StoreError> {
        self.check()?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .candidates
            .values()
            .cloned()
            .collect())
    }

    fn candidate_count(&self) -> Result<u64, StoreError> {
        self.check()?;
        Ok(self.state.lock().unwrap().candidates.len() as u64)
    }
}

impl VoterStore for NullStore {
    fn insert_voter(&self, voter: &Voter) -> Result<(), StoreError> {
        self.check()?;
        let mut state = self.state.lock().unwrap();
        if state.voters.contains_key(&voter.id) {
            return Err(StoreError::Duplicate {
                kind: "voter",
                key: voter.id.to_string(),
            });
        }
        state.voters.insert(voter.id.clone(), voter.clone());
        Ok(())
    }

    fn get_voter(&self, id: &VoterId) -> Result<Voter, StoreError> {
        self.check()?;
        self.state
            .lock()
            .unwrap()
            .voters
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::voter_not_found(id))
    }

    fn voter_exists(&self, id: &VoterId) -> Result<bool, StoreError> {
        self.check()?;
        Ok(self.state.lock().unwrap().voters.contains_key(id))
    }

    fn iter_voters(&self) -> Result<Vec<Voter>, StoreError> {
        self.check()?;
        Ok(self.state.lock().unwrap().voters.values().cloned().collect())
    }

    fn voter_count(&self) -> Result<u64, StoreError> {
        self.check()?;
        Ok(self.state.lock().unwrap().voters.len() as u64)
    }
}

impl BallotStore for NullStore {
    fn cast_vote(
        &self,
        voter_id: &VoterId,
        candidate_id: &CandidateId,
        at: Timestamp,
    ) -> Result<VoteOutcome, StoreError> {
        self.check()?;
        let mut guard = self.state.lock().unwrap();
        let state = &mut *guard;

        let candidate = state
            .candidates
            .get_mut(candidate_id)
            .ok_or_else(|| StoreError::candidate_not_found(candidate_id))?;
        let voter = state
            .voters
            .get_mut(voter_id)
            .ok_or_else(|| StoreError::voter_not_found(voter_id))?;

        if let Err(existing) = voter.record_vote(candidate, at) {
            return Ok(VoteOutcome::AlreadyVoted(existing));
        }
        candidate.votes += 1;
        Ok(VoteOutcome::Applied(candidate.clone()))
    }

    fn remove_candidate(&self, id: &CandidateId) -> Result<CascadeReport, StoreError> {
        self.check()?;
        let mut state = self.state.lock().unwrap();

        let candidate = state
            .candidates
            .remove(id)
            .ok_or_else(|| StoreError::candidate_not_found(id))?;
        state.candidate_keys.remove(&candidate.identity_key());

        let mut removed = 0u64;
        let mut touched = 0u64;
        for voter in state.voters.values_mut() {
            let stripped = voter.strip_candidate(id);
            if stripped > 0 {
                removed += stripped as u64;
                touched += 1;
            }
        }

        Ok(CascadeReport {
            candidate,
            ledger_entries_removed: removed,
            voters_touched: touched,
        })
    }
}

impl MetaStore for NullStore {
    fn schema_version(&self) -> Result<u32, StoreError> {
        self.check()?;
        Ok(self.state.lock().unwrap().schema_version)
    }

    fn set_schema_version(&self, version: u32) -> Result<(), StoreError> {
        self.check()?;
        self.state.lock().unwrap().schema_version = version;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballot_store::DEFAULT_PHOTO;
    use ballot_types::{Gender, Role, SportCategory};

    fn candidate(byte: u8, name: &str, category: SportCategory, gender: Gender) -> Candidate {
        Candidate {
            id: CandidateId::new([byte; 12]),
            name: name.to_string(),
            gender,
            sport_category: category,
            photo: DEFAULT_PHOTO.to_string(),
            votes: 0,
            created_by: None,
            created_at: Timestamp::EPOCH,
        }
    }

    fn voter(name: &str) -> Voter {
        Voter::new(
            VoterId::new(format!("{name}@college.edu")).unwrap(),
            name,
            "hash",
            Role::User,
            Timestamp::EPOCH,
        )
    }

    #[test]
    fn duplicate_identity_is_rejected() {
        let store = NullStore::new();
        store
            .insert_candidate(&candidate(1, "Aarav Sharma", SportCategory::CricketSecretary, Gender::Male))
            .unwrap();
        let err = store
            .insert_candidate(&candidate(2, " aarav  SHARMA", SportCategory::CricketSecretary, Gender::Male))
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { kind: "candidate", .. }));
        // Same name in another race is a different candidate.
        store
            .insert_candidate(&candidate(3, "Aarav Sharma", SportCategory::CricketSecretary, Gender::Female))
            .unwrap();
        assert_eq!(store.candidate_count().unwrap(), 2);
    }

    #[test]
    fn vote_and_cascade() {
        let store = NullStore::new();
        let x = candidate(1, "X", SportCategory::CricketSecretary, Gender::Male);
        let v = voter("asha");
        store.insert_candidate(&x).unwrap();
        store.insert_voter(&v).unwrap();

        assert!(matches!(
            store.cast_vote(&v.id, &x.id, Timestamp::new(3)).unwrap(),
            VoteOutcome::Applied(ref c) if c.votes == 1
        ));
        assert!(matches!(
            store.cast_vote(&v.id, &x.id, Timestamp::new(4)).unwrap(),
            VoteOutcome::AlreadyVoted(_)
        ));

        let report = store.remove_candidate(&x.id).unwrap();
        assert_eq!(report.ledger_entries_removed, 1);
        assert_eq!(report.voters_touched, 1);
        assert!(store.get_voter(&v.id).unwrap().voted_categories.is_empty());
        // Identity key is released with the candidate.
        store.insert_candidate(&candidate(9, "X", SportCategory::CricketSecretary, Gender::Male)).unwrap();
    }

    #[test]
    fn unavailable_store_fails_every_call() {
        let store = NullStore::new();
        store.set_unavailable(true);
        assert!(matches!(store.iter_candidates(), Err(StoreError::Backend(_))));
        assert!(matches!(store.schema_version(), Err(StoreError::Backend(_))));
        store.set_unavailable(false);
        assert_eq!(store.schema_version().unwrap(), 0);
    }
}
