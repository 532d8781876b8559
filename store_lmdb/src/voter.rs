//! LMDB implementation of VoterStore.

use ballot_store::{StoreError, Voter, VoterStore};
use ballot_types::VoterId;

use crate::environment::encode;
use crate::{LmdbEnvironment, LmdbError};

impl VoterStore for LmdbEnvironment {
    fn insert_voter(&self, voter: &Voter) -> Result<(), StoreError> {
        let key = voter.id.as_str().as_bytes();
        let bytes = encode(voter)?;

        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        if self
            .voters_db
            .get(&wtxn, key)
            .map_err(LmdbError::from)?
            .is_some()
        {
            return Err(StoreError::Duplicate {
                kind: "voter",
                key: voter.id.to_string(),
            });
        }
        self.voters_db
            .put(&mut wtxn, key, &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn get_voter(&self, id: &VoterId) -> Result<Voter, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        self.read_record(&rtxn, self.voters_db, id.as_str().as_bytes())?
            .ok_or_else(|| StoreError::voter_not_found(id))
    }

    fn voter_exists(&self, id: &VoterId) -> Result<bool, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let found = self
            .voters_db
            .get(&rtxn, id.as_str().as_bytes())
            .map_err(LmdbError::from)?
            .is_some();
        Ok(found)
    }

    fn iter_voters(&self) -> Result<Vec<Voter>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.read_all(&rtxn, self.voters_db)?)
    }

    fn voter_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let count = self.voters_db.len(&rtxn).map_err(LmdbError::from)?;
        Ok(count)
    }
}
