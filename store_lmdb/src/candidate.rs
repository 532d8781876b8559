//! LMDB implementation of CandidateStore.

use ballot_store::{Candidate, CandidateStore, StoreError};
use ballot_types::CandidateId;

use crate::environment::encode;
use crate::{LmdbEnvironment, LmdbError};

impl CandidateStore for LmdbEnvironment {
    fn insert_candidate(&self, candidate: &Candidate) -> Result<(), StoreError> {
        let identity = candidate.identity_key();
        let bytes = encode(candidate)?;

        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        if self
            .candidates_db
            .get(&wtxn, candidate.id.as_bytes())
            .map_err(LmdbError::from)?
            .is_some()
        {
            return Err(StoreError::Duplicate {
                kind: "candidate id",
                key: candidate.id.to_string(),
            });
        }
        if self
            .candidate_keys_db
            .get(&wtxn, &identity)
            .map_err(LmdbError::from)?
            .is_some()
        {
            return Err(StoreError::Duplicate {
                kind: "candidate",
                key: format!("{} in {}", candidate.name.trim(), candidate.pair()),
            });
        }

        self.candidates_db
            .put(&mut wtxn, candidate.id.as_bytes(), &bytes)
            .map_err(LmdbError::from)?;
        self.candidate_keys_db
            .put(&mut wtxn, &identity, candidate.id.as_bytes())
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn get_candidate(&self, id: &CandidateId) -> Result<Candidate, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        self.read_record(&rtxn, self.candidates_db, id.as_bytes())?
            .ok_or_else(|| StoreError::candidate_not_found(id))
    }

    fn candidate_exists(&self, id: &CandidateId) -> Result<bool, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let found = self
            .candidates_db
            .get(&rtxn, id.as_bytes())
            .map_err(LmdbError::from)?
            .is_some();
        Ok(found)
    }

    fn iter_candidates(&self) -> Result<Vec<Candidate>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.read_all(&rtxn, self.candidates_db)?)
    }

    fn candidate_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let count = self.candidates_db.len(&rtxn).map_err(LmdbError::from)?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::DEFAULT_MAP_SIZE;
    use ballot_store::DEFAULT_PHOTO;
    use ballot_types::{Gender, SportCategory, Timestamp};

    fn temp_env() -> (tempfile::TempDir, LmdbEnvironment) {
        let dir = tempfile::tempdir().expect("temp dir");
        let env = LmdbEnvironment::open(dir.path(), DEFAULT_MAP_SIZE).expect("open env");
        (dir, env)
    }

    fn candidate(byte: u8, name: &str) -> Candidate {
        Candidate {
            id: CandidateId::new([byte; 12]),
            name: name.into(),
            gender: Gender::Male,
            sport_category: SportCategory::CricketSecretary,
            photo: DEFAULT_PHOTO.into(),
            votes: 0,
            created_by: None,
            created_at: Timestamp::new(1),
        }
    }

    #[test]
    fn insert_then_get() {
        let (_dir, env) = temp_env();
        let c = candidate(1, "Aarav Sharma");
        env.insert_candidate(&c).unwrap();
        assert_eq!(env.get_candidate(&c.id).unwrap(), c);
        assert!(env.candidate_exists(&c.id).unwrap());
        assert_eq!(env.candidate_count().unwrap(), 1);
    }

    #[test]
    fn missing_candidate_is_not_found() {
        let (_dir, env) = temp_env();
        let err = env.get_candidate(&CandidateId::new([9; 12])).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { kind: "candidate", .. }));
    }

    #[test]
    fn same_person_in_same_race_is_duplicate() {
        let (_dir, env) = temp_env();
        env.insert_candidate(&candidate(1, "Aarav Sharma")).unwrap();
        let err = env
            .insert_candidate(&candidate(2, "  aarav sharma"))
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { .. }));
        assert_eq!(env.candidate_count().unwrap(), 1);
    }

    #[test]
    fn longest_accepted_name_fits_the_identity_index() {
        let (_dir, env) = temp_env();
        let ascii = candidate(1, &"a".repeat(ballot_store::MAX_NAME_LEN));
        let accented = candidate(2, &"\u{e9}".repeat(ballot_store::MAX_NAME_LEN / 2));
        env.insert_candidate(&ascii).unwrap();
        env.insert_candidate(&accented).unwrap();
        assert_eq!(env.candidate_count().unwrap(), 2);
    }

    #[test]
    fn reused_id_is_duplicate() {
        let (_dir, env) = temp_env();
        env.insert_candidate(&candidate(1, "Aarav Sharma")).unwrap();
        let err = env.insert_candidate(&candidate(1, "Kabir Verma")).unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { kind: "candidate id", .. }));
    }
}
