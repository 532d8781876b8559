//! Candidate records and their storage trait.

use ballot_types::{CandidateId, Gender, SportCategory, Timestamp, VoterId, VotingPair};
use serde::{Deserialize, Serialize};

use crate::StoreError;

/// Photo shown when an admin creates a candidate without one.
pub const DEFAULT_PHOTO: &str = "https://via.placeholder.com/300x200?text=Candidate+Photo";

/// A person standing in one (category, gender) race.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    pub gender: Gender,
    pub sport_category: SportCategory,
    pub photo: String,
    /// Tally. Always equals the number of ledger entries naming this candidate.
    pub votes: u64,
    /// Admin who created the candidate; `None` for seeded rosters.
    pub created_by: Option<VoterId>,
    pub created_at: Timestamp,
}

impl Candidate {
    pub fn pair(&self) -> VotingPair {
        VotingPair::new(self.sport_category, self.gender)
    }

    /// Uniqueness key: two candidates with the same key are the same person
    /// standing in the same race.
    pub fn identity_key(&self) -> Vec<u8> {
        identity_key(self.sport_category, self.gender, &self.name)
    }
}

/// Longest accepted candidate name, in bytes after [`normalize_name`].
/// Keeps the identity key well under LMDB's 511-byte key limit.
pub const MAX_NAME_LEN: usize = 200;

/// Composite key `(category tag, gender tag, normalized name)`.
pub fn identity_key(category: SportCategory, gender: Gender, name: &str) -> Vec<u8> {
    let normalized = normalize_name(name);
    let mut key = Vec::with_capacity(2 + normalized.len());
    key.push(category.tag());
    key.push(gender.tag());
    key.extend_from_slice(normalized.as_bytes());
    key
}

/// Lowercase, trimmed, with internal whitespace runs collapsed to one space.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Trait for candidate storage operations.
pub trait CandidateStore {
    /// Insert a new candidate.
    ///
    /// Fails with [`StoreError::Duplicate`] if the id or the identity key is
    /// already taken.
    fn insert_candidate(&self, candidate: &Candidate) -> Result<(), StoreError>;

    fn get_candidate(&self, id: &CandidateId) -> Result<Candidate, StoreError>;

    fn candidate_exists(&self, id: &CandidateId) -> Result<bool, StoreError>;

    /// All candidates, in no particular order.
    fn iter_candidates(&self) -> Result<Vec<Candidate>, StoreError>;

    fn candidate_count(&self) -> Result<u64, StoreError> {
        self.iter_candidates().map(|c| c.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_whitespace_and_case() {
        assert_eq!(normalize_name("  Aarav   Sharma "), "aarav sharma");
        assert_eq!(normalize_name("AARAV\tSHARMA"), "aarav sharma");
    }

    #[test]
    fn identity_key_separates_races() {
        let a = identity_key(SportCategory::CricketSecretary, Gender::Male, "Aarav Sharma");
        let b = identity_key(SportCategory::CricketSecretary, Gender::Female, "Aarav Sharma");
        let c = identity_key(SportCategory::CricketSecretary, Gender::Male, " aarav  sharma");
        assert_ne!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn json_uses_camel_case() {
        let candidate = Candidate {
            id: CandidateId::new([7; 12]),
            name: "Diya Kapoor".into(),
            gender: Gender::Female,
            sport_category: SportCategory::IndoorGamesSecretary,
            photo: DEFAULT_PHOTO.into(),
            votes: 3,
            created_by: None,
            created_at: Timestamp::new(10),
        };
        let json = serde_json::to_value(&candidate).unwrap();
        assert_eq!(json["sportCategory"], "Indoor Games Secretary");
        assert_eq!(json["votes"], 3);
        assert!(json["createdBy"].is_null());
    }
}
