//! Tally audit: recompute every tally from the voter ledgers.
//!
//! A healthy store never drifts, so any finding here means data was
//! written around the engine (a restored backup, a manual edit).

use std::collections::{HashMap, HashSet};

use ballot_store::BallotStore;
use ballot_types::{CandidateId, VoterId};
use serde::Serialize;

use crate::{Election, ElectionError};

/// A candidate whose stored counter disagrees with the ledgers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TallyDrift {
    pub candidate: CandidateId,
    pub recorded: u64,
    pub ledger: u64,
}

/// A ledger entry naming a candidate that no longer exists.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DanglingEntry {
    pub voter: VoterId,
    pub candidate: CandidateId,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TallyAudit {
    pub candidates_checked: u64,
    pub voters_checked: u64,
    pub ledger_entries: u64,
    pub drifts: Vec<TallyDrift>,
    pub dangling: Vec<DanglingEntry>,
    /// Voters holding more than one entry for the same pair.
    pub duplicate_pairs: Vec<VoterId>,
}

impl TallyAudit {
    pub fn is_consistent(&self) -> bool {
        self.drifts.is_empty() && self.dangling.is_empty() && self.duplicate_pairs.is_empty()
    }

    /// One-line count of every kind of finding.
    pub fn summary(&self) -> String {
        format!(
            "{} drifted tallies, {} dangling entries, {} voters with duplicate pairs",
            self.drifts.len(),
            self.dangling.len(),
            self.duplicate_pairs.len()
        )
    }
}

impl<S: BallotStore> Election<S> {
    /// Compare every stored tally against the ledger entries referencing it.
    ///
    /// Reads candidates and voters in two separate calls, so votes landing
    /// in between can show up as transient drift.
    pub fn audit(&self) -> Result<TallyAudit, ElectionError> {
        let candidates = self.store().iter_candidates()?;
        let voters = self.store().iter_voters()?;

        let mut audit = TallyAudit {
            candidates_checked: candidates.len() as u64,
            voters_checked: voters.len() as u64,
            ..TallyAudit::default()
        };

        let known: HashSet<CandidateId> = candidates.iter().map(|c| c.id).collect();
        let mut counted: HashMap<CandidateId, u64> = HashMap::new();
        for voter in &voters {
            let mut pairs = HashSet::new();
            for entry in &voter.voted_categories {
                audit.ledger_entries += 1;
                if !pairs.insert(entry.pair()) && audit.duplicate_pairs.last() != Some(&voter.id) {
                    audit.duplicate_pairs.push(voter.id.clone());
                }
                if known.contains(&entry.candidate) {
                    *counted.entry(entry.candidate).or_default() += 1;
                } else {
                    audit.dangling.push(DanglingEntry {
                        voter: voter.id.clone(),
                        candidate: entry.candidate,
                    });
                }
            }
        }

        for candidate in &candidates {
            let ledger = counted.get(&candidate.id).copied().unwrap_or(0);
            if ledger != candidate.votes {
                audit.drifts.push(TallyDrift {
                    candidate: candidate.id,
                    recorded: candidate.votes,
                    ledger,
                });
            }
        }

        if audit.is_consistent() {
            tracing::info!(
                candidates = audit.candidates_checked,
                voters = audit.voters_checked,
                entries = audit.ledger_entries,
                "tally audit clean"
            );
        } else {
            tracing::warn!(
                drifts = audit.drifts.len(),
                dangling = audit.dangling.len(),
                duplicate_pairs = audit.duplicate_pairs.len(),
                "tally audit found inconsistencies"
            );
        }
        Ok(audit)
    }
}
