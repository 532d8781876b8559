//! LMDB database integrity checks.
//!
//! Run on open to detect corruption early, before the service starts
//! accepting votes.

use std::path::Path;
use std::sync::Arc;

use ballot_store::{Candidate, Voter};
use heed::types::Bytes;
use heed::Env;

use crate::environment::{CANDIDATES_DB, CANDIDATE_KEYS_DB, META_DB, VOTERS_DB};
use crate::LmdbError;

/// Summary of an integrity check run.
#[derive(Debug)]
pub struct IntegrityReport {
    pub databases_checked: u32,
    pub total_entries: u64,
    pub errors: Vec<String>,
}

impl IntegrityReport {
    /// Returns `true` if no errors were detected.
    pub fn is_healthy(&self) -> bool {
        self.errors.is_empty()
    }
}

const EXPECTED_DATABASES: &[&str] = &[CANDIDATES_DB, CANDIDATE_KEYS_DB, VOTERS_DB, META_DB];

/// Open each expected database, count its entries, and decode every
/// candidate and voter record. Failures are collected in the report rather
/// than returned as a hard error.
pub fn check_integrity(env: &Arc<Env>) -> Result<IntegrityReport, LmdbError> {
    let mut report = IntegrityReport {
        databases_checked: 0,
        total_entries: 0,
        errors: Vec::new(),
    };

    let rtxn = env.read_txn()?;

    for &db_name in EXPECTED_DATABASES {
        let db = match env.open_database::<Bytes, Bytes>(&rtxn, Some(db_name)) {
            Ok(Some(db)) => db,
            Ok(None) => {
                report
                    .errors
                    .push(format!("database '{db_name}' is missing"));
                continue;
            }
            Err(e) => {
                report
                    .errors
                    .push(format!("failed to open database '{db_name}': {e}"));
                continue;
            }
        };

        report.databases_checked += 1;
        match db.len(&rtxn) {
            Ok(count) => report.total_entries += count,
            Err(e) => {
                report
                    .errors
                    .push(format!("failed to read database '{db_name}': {e}"));
                continue;
            }
        }

        let decode: fn(&[u8]) -> bool = match db_name {
            CANDIDATES_DB => |v| bincode::deserialize::<Candidate>(v).is_ok(),
            VOTERS_DB => |v| bincode::deserialize::<Voter>(v).is_ok(),
            _ => continue,
        };
        let iter = match db.iter(&rtxn) {
            Ok(iter) => iter,
            Err(e) => {
                report
                    .errors
                    .push(format!("failed to iterate database '{db_name}': {e}"));
                continue;
            }
        };
        let mut undecodable = 0u64;
        for item in iter {
            match item {
                Ok((_, val)) if decode(val) => {}
                Ok(_) => undecodable += 1,
                Err(e) => {
                    report
                        .errors
                        .push(format!("failed to read entry in '{db_name}': {e}"));
                    break;
                }
            }
        }
        if undecodable > 0 {
            report
                .errors
                .push(format!("{undecodable} undecodable records in '{db_name}'"));
        }
    }

    Ok(report)
}

/// Check if the LMDB data directory looks valid before opening.
///
/// A missing or empty directory is a fresh start. A directory with other
/// files but no `data.mdb` suggests the wrong path or a damaged install.
pub fn check_data_dir(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Ok(());
    }
    if path.join("data.mdb").exists() {
        return Ok(());
    }
    let is_empty = std::fs::read_dir(path)
        .map(|mut entries| entries.next().is_none())
        .map_err(|e| format!("cannot read data directory {}: {e}", path.display()))?;
    if is_empty {
        Ok(())
    } else {
        Err(format!(
            "directory {} is not empty but data.mdb is missing",
            path.display()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_data_dir_fresh_path() {
        let dir = tempfile::tempdir().unwrap();
        assert!(check_data_dir(&dir.path().join("nonexistent")).is_ok());
        assert!(check_data_dir(dir.path()).is_ok());
    }

    #[test]
    fn check_data_dir_rejects_foreign_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"hello").unwrap();
        assert!(check_data_dir(dir.path()).is_err());
    }

    #[test]
    fn unhealthy_report() {
        let report = IntegrityReport {
            databases_checked: 4,
            total_entries: 100,
            errors: vec!["corruption detected".to_string()],
        };
        assert!(!report.is_healthy());
    }
}
