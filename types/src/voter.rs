//! Voter identity.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// Identity of a voter as asserted by the authentication service
/// (in practice the student's college e-mail address).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VoterId(String);

impl VoterId {
    /// Longest identity accepted; LMDB keys are capped at 511 bytes.
    pub const MAX_LEN: usize = 254;

    /// Build a voter id, trimming surrounding whitespace.
    pub fn new(raw: impl Into<String>) -> Result<Self, TypesError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.len() > Self::MAX_LEN {
            return Err(TypesError::InvalidVoterId(raw));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VoterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for VoterId {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for VoterId {
    type Error = TypesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<VoterId> for String {
    fn from(id: VoterId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_rejects_blank() {
        assert_eq!(
            VoterId::new("  student@college.edu ").unwrap().as_str(),
            "student@college.edu"
        );
        assert!(VoterId::new("   ").is_err());
        assert!(VoterId::new("x".repeat(VoterId::MAX_LEN + 1)).is_err());
    }

    #[test]
    fn deserialize_validates() {
        assert!(serde_json::from_str::<VoterId>("\"\"").is_err());
        let id: VoterId = serde_json::from_str("\"a@b.c\"").unwrap();
        assert_eq!(id.as_str(), "a@b.c");
    }
}
