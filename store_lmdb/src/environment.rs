//! LMDB environment setup.
//!
//! One environment holds every database. Candidates and voters live in
//! separate databases but share the environment's single writer, which is
//! what lets a vote or a cascade delete commit as one transaction.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions, RoTxn};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::integrity::{check_data_dir, check_integrity};
use crate::migration::migrate;
use crate::LmdbError;

/// Named databases inside the environment.
pub(crate) const CANDIDATES_DB: &str = "candidates";
pub(crate) const CANDIDATE_KEYS_DB: &str = "candidate_keys";
pub(crate) const VOTERS_DB: &str = "voters";
pub(crate) const META_DB: &str = "meta";

const MAX_DBS: u32 = 8;

/// Default map size: 256 MiB is several orders of magnitude above a
/// college election's footprint.
pub const DEFAULT_MAP_SIZE: usize = 256 * 1024 * 1024;

/// Wraps the LMDB environment and all database handles.
pub struct LmdbEnvironment {
    pub(crate) env: Arc<Env>,
    /// `CandidateId` bytes → bincode `Candidate`.
    pub(crate) candidates_db: Database<Bytes, Bytes>,
    /// Candidate identity key → `CandidateId` bytes. Enforces uniqueness.
    pub(crate) candidate_keys_db: Database<Bytes, Bytes>,
    /// `VoterId` UTF-8 → bincode `Voter` (ledger embedded).
    pub(crate) voters_db: Database<Bytes, Bytes>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
    path: PathBuf,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given path, verify it, and
    /// bring its schema up to date.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        check_data_dir(path).map_err(LmdbError::Integrity)?;
        std::fs::create_dir_all(path)?;

        // SAFETY: the environment is opened once per process and the data
        // directory is not shared with other processes that could truncate
        // the memory map underneath us.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(MAX_DBS)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let candidates_db = env.create_database(&mut wtxn, Some(CANDIDATES_DB))?;
        let candidate_keys_db = env.create_database(&mut wtxn, Some(CANDIDATE_KEYS_DB))?;
        let voters_db = env.create_database(&mut wtxn, Some(VOTERS_DB))?;
        let meta_db = env.create_database(&mut wtxn, Some(META_DB))?;
        wtxn.commit()?;

        let env = Arc::new(env);
        let report = check_integrity(&env)?;
        if !report.is_healthy() {
            return Err(LmdbError::Integrity(report.errors.join("; ")));
        }
        tracing::info!(
            path = %path.display(),
            databases = report.databases_checked,
            entries = report.total_entries,
            "opened ballot database"
        );

        let store = Self {
            env,
            candidates_db,
            candidate_keys_db,
            voters_db,
            meta_db,
            path: path.to_path_buf(),
        };
        if let Some(from) = migrate(&store)? {
            tracing::info!(from, "ballot database schema upgraded");
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and decode one record inside an existing transaction.
    pub(crate) fn read_record<T: DeserializeOwned>(
        &self,
        txn: &RoTxn<'_>,
        db: Database<Bytes, Bytes>,
        key: &[u8],
    ) -> Result<Option<T>, LmdbError> {
        match db.get(txn, key)? {
            Some(bytes) => Ok(Some(bincode::deserialize(bytes)?)),
            None => Ok(None),
        }
    }

    /// Decode every record in a database inside an existing transaction.
    pub(crate) fn read_all<T: DeserializeOwned>(
        &self,
        txn: &RoTxn<'_>,
        db: Database<Bytes, Bytes>,
    ) -> Result<Vec<T>, LmdbError> {
        let mut out = Vec::new();
        for item in db.iter(txn)? {
            let (_, val) = item?;
            out.push(bincode::deserialize(val)?);
        }
        Ok(out)
    }
}

pub(crate) fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, LmdbError> {
    Ok(bincode::serialize(value)?)
}
