//! Schema versioning for the ballot database.
//!
//! Version history:
//! - 1: `candidates`, `voters`, and `meta` databases.
//! - 2: adds the `candidate_keys` identity index used to reject duplicate
//!   candidates. Upgrading rebuilds it from the stored candidates.

use ballot_store::{Candidate, MetaStore, StoreError};

use crate::{LmdbEnvironment, LmdbError};

pub const CURRENT_SCHEMA_VERSION: u32 = 2;

/// Bring the database at `env` up to [`CURRENT_SCHEMA_VERSION`].
///
/// Returns the version the database was at before migrating, or `None`
/// when nothing had to change. A stored version newer than this build
/// understands is refused.
pub fn migrate(env: &LmdbEnvironment) -> Result<Option<u32>, LmdbError> {
    let stored = env.schema_version().map_err(meta_failure)?;
    if stored == CURRENT_SCHEMA_VERSION {
        tracing::debug!(version = stored, "database schema is up to date");
        return Ok(None);
    }
    if stored > CURRENT_SCHEMA_VERSION {
        return Err(LmdbError::Integrity(format!(
            "database schema version {stored} is newer than supported version {CURRENT_SCHEMA_VERSION}"
        )));
    }

    for from in stored..CURRENT_SCHEMA_VERSION {
        tracing::info!(from, to = from + 1, "migrating ballot database");
        step(env, from)?;
        env.set_schema_version(from + 1).map_err(meta_failure)?;
    }
    Ok(Some(stored))
}

fn meta_failure(e: StoreError) -> LmdbError {
    LmdbError::Heed(e.to_string())
}

fn step(env: &LmdbEnvironment, from: u32) -> Result<(), LmdbError> {
    match from {
        // Fresh database: everything is created on open.
        0 => Ok(()),
        1 => rebuild_candidate_keys(env).map(|indexed| {
            tracing::info!(indexed, "rebuilt candidate identity index");
        }),
        _ => Err(LmdbError::Integrity(format!(
            "no migration from schema version {from}"
        ))),
    }
}

/// Recreate the identity index from the candidate records. Two stored
/// candidates with the same identity make the database unusable and are
/// reported rather than silently merged.
fn rebuild_candidate_keys(env: &LmdbEnvironment) -> Result<u64, LmdbError> {
    let mut wtxn = env.env.write_txn()?;
    let candidates: Vec<Candidate> = env.read_all(&wtxn, env.candidates_db)?;
    env.candidate_keys_db.clear(&mut wtxn)?;
    for candidate in &candidates {
        let key = candidate.identity_key();
        if env.candidate_keys_db.get(&wtxn, &key)?.is_some() {
            return Err(LmdbError::Integrity(format!(
                "duplicate candidate {} in {}",
                candidate.name,
                candidate.pair()
            )));
        }
        env.candidate_keys_db
            .put(&mut wtxn, &key, candidate.id.as_bytes())?;
    }
    wtxn.commit()?;
    Ok(candidates.len() as u64)
}
