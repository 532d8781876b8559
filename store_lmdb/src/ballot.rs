//! LMDB implementation of BallotStore.
//!
//! LMDB admits one write transaction at a time, so reading the ledger,
//! deciding, and writing both records inside a single `RwTxn` is
//! serialisable with respect to every other vote or delete. Dropping the
//! transaction without committing aborts it, leaving no partial write.

use ballot_store::{BallotStore, Candidate, CascadeReport, StoreError, VoteOutcome, Voter};
use ballot_types::{CandidateId, Timestamp, VoterId};

use crate::environment::encode;
use crate::{LmdbEnvironment, LmdbError};

impl BallotStore for LmdbEnvironment {
    fn cast_vote(
        &self,
        voter_id: &VoterId,
        candidate_id: &CandidateId,
        at: Timestamp,
    ) -> Result<VoteOutcome, StoreError> {
        let voter_key = voter_id.as_str().as_bytes();
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;

        let mut candidate: Candidate = self
            .read_record(&wtxn, self.candidates_db, candidate_id.as_bytes())?
            .ok_or_else(|| StoreError::candidate_not_found(candidate_id))?;
        let mut voter: Voter = self
            .read_record(&wtxn, self.voters_db, voter_key)?
            .ok_or_else(|| StoreError::voter_not_found(voter_id))?;

        if let Err(existing) = voter.record_vote(&candidate, at) {
            drop(wtxn);
            return Ok(VoteOutcome::AlreadyVoted(existing));
        }
        candidate.votes = candidate
            .votes
            .checked_add(1)
            .ok_or_else(|| StoreError::Corruption(format!("tally overflow for {candidate_id}")))?;

        let candidate_bytes = encode(&candidate)?;
        let voter_bytes = encode(&voter)?;
        self.candidates_db
            .put(&mut wtxn, candidate_id.as_bytes(), &candidate_bytes)
            .map_err(LmdbError::from)?;
        self.voters_db
            .put(&mut wtxn, voter_key, &voter_bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;

        Ok(VoteOutcome::Applied(candidate))
    }

    fn remove_candidate(&self, id: &CandidateId) -> Result<CascadeReport, StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;

        let candidate: Candidate = self
            .read_record(&wtxn, self.candidates_db, id.as_bytes())?
            .ok_or_else(|| StoreError::candidate_not_found(id))?;

        let mut touched: Vec<Voter> = Vec::new();
        let mut removed = 0u64;
        for mut voter in self.read_all::<Voter>(&wtxn, self.voters_db)? {
            let stripped = voter.strip_candidate(id);
            if stripped > 0 {
                removed += stripped as u64;
                touched.push(voter);
            }
        }

        self.candidates_db
            .delete(&mut wtxn, id.as_bytes())
            .map_err(LmdbError::from)?;
        self.candidate_keys_db
            .delete(&mut wtxn, &candidate.identity_key())
            .map_err(LmdbError::from)?;
        for voter in &touched {
            let bytes = encode(voter)?;
            self.voters_db
                .put(&mut wtxn, voter.id.as_str().as_bytes(), &bytes)
                .map_err(LmdbError::from)?;
        }
        wtxn.commit().map_err(LmdbError::from)?;

        Ok(CascadeReport {
            candidate,
            ledger_entries_removed: removed,
            voters_touched: touched.len() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::DEFAULT_MAP_SIZE;
    use ballot_store::{CandidateStore, VoterStore, DEFAULT_PHOTO};
    use ballot_types::{Gender, Role, SportCategory};

    fn temp_env() -> (tempfile::TempDir, LmdbEnvironment) {
        let dir = tempfile::tempdir().expect("temp dir");
        let env = LmdbEnvironment::open(dir.path(), DEFAULT_MAP_SIZE).expect("open env");
        (dir, env)
    }

    fn add_candidate(env: &LmdbEnvironment, byte: u8, category: SportCategory, gender: Gender) -> CandidateId {
        let c = Candidate {
            id: CandidateId::new([byte; 12]),
            name: format!("candidate {byte}"),
            gender,
            sport_category: category,
            photo: DEFAULT_PHOTO.into(),
            votes: 0,
            created_by: None,
            created_at: Timestamp::new(1),
        };
        env.insert_candidate(&c).unwrap();
        c.id
    }

    fn add_voter(env: &LmdbEnvironment, name: &str) -> VoterId {
        let id = VoterId::new(format!("{name}@college.edu")).unwrap();
        env.insert_voter(&Voter::new(id.clone(), name, "hash", Role::User, Timestamp::new(1)))
            .unwrap();
        id
    }

    #[test]
    fn vote_updates_tally_and_ledger_together() {
        let (_dir, env) = temp_env();
        let x = add_candidate(&env, 1, SportCategory::CricketSecretary, Gender::Male);
        let v = add_voter(&env, "asha");

        let outcome = env.cast_vote(&v, &x, Timestamp::new(50)).unwrap();
        let VoteOutcome::Applied(updated) = outcome else {
            panic!("expected applied, got {outcome:?}");
        };
        assert_eq!(updated.votes, 1);
        assert_eq!(env.get_candidate(&x).unwrap().votes, 1);

        let ledger = env.get_voter(&v).unwrap().voted_categories;
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger[0].candidate, x);
        assert_eq!(ledger[0].voted_at, Timestamp::new(50));
    }

    #[test]
    fn second_vote_in_pair_writes_nothing() {
        let (_dir, env) = temp_env();
        let x = add_candidate(&env, 1, SportCategory::CricketSecretary, Gender::Male);
        let y = add_candidate(&env, 2, SportCategory::CricketSecretary, Gender::Male);
        let v = add_voter(&env, "asha");

        env.cast_vote(&v, &x, Timestamp::new(1)).unwrap();
        let outcome = env.cast_vote(&v, &y, Timestamp::new(2)).unwrap();
        assert!(matches!(outcome, VoteOutcome::AlreadyVoted(ref e) if e.candidate == x));
        assert_eq!(env.get_candidate(&x).unwrap().votes, 1);
        assert_eq!(env.get_candidate(&y).unwrap().votes, 0);
        assert_eq!(env.get_voter(&v).unwrap().voted_categories.len(), 1);
    }

    #[test]
    fn vote_with_unknown_records_is_not_found() {
        let (_dir, env) = temp_env();
        let x = add_candidate(&env, 1, SportCategory::CricketSecretary, Gender::Male);
        let v = add_voter(&env, "asha");
        let ghost = VoterId::new("ghost@college.edu").unwrap();

        assert!(matches!(
            env.cast_vote(&ghost, &x, Timestamp::new(1)).unwrap_err(),
            StoreError::NotFound { kind: "voter", .. }
        ));
        assert!(matches!(
            env.cast_vote(&v, &CandidateId::new([7; 12]), Timestamp::new(1)).unwrap_err(),
            StoreError::NotFound { kind: "candidate", .. }
        ));
        assert_eq!(env.get_candidate(&x).unwrap().votes, 0);
    }

    #[test]
    fn remove_candidate_cascades_only_its_entries() {
        let (_dir, env) = temp_env();
        let x = add_candidate(&env, 1, SportCategory::CricketSecretary, Gender::Male);
        let other = add_candidate(&env, 2, SportCategory::IndoorGamesSecretary, Gender::Female);
        let a = add_voter(&env, "asha");
        let b = add_voter(&env, "bilal");
        let c = add_voter(&env, "chen");

        env.cast_vote(&a, &x, Timestamp::new(1)).unwrap();
        env.cast_vote(&b, &x, Timestamp::new(1)).unwrap();
        env.cast_vote(&a, &other, Timestamp::new(1)).unwrap();
        env.cast_vote(&c, &other, Timestamp::new(1)).unwrap();

        let report = env.remove_candidate(&x).unwrap();
        assert_eq!(report.ledger_entries_removed, 2);
        assert_eq!(report.voters_touched, 2);
        assert!(!env.candidate_exists(&x).unwrap());

        let a_ledger = env.get_voter(&a).unwrap().voted_categories;
        assert_eq!(a_ledger.len(), 1);
        assert_eq!(a_ledger[0].candidate, other);
        assert_eq!(env.get_voter(&c).unwrap().voted_categories.len(), 1);

        // The freed pair is votable again.
        let x2 = add_candidate(&env, 3, SportCategory::CricketSecretary, Gender::Male);
        assert!(matches!(
            env.cast_vote(&a, &x2, Timestamp::new(2)).unwrap(),
            VoteOutcome::Applied(_)
        ));
    }

    #[test]
    fn remove_unknown_candidate_is_not_found() {
        let (_dir, env) = temp_env();
        assert!(matches!(
            env.remove_candidate(&CandidateId::new([4; 12])).unwrap_err(),
            StoreError::NotFound { .. }
        ));
    }
}
