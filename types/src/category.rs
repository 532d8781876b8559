//! Sport categories and genders.
//!
//! Both sets are closed: adding a category is a code change, and every
//! `match` over them is checked for exhaustiveness by the compiler. The
//! serialized form is the display name used by the dashboard
//! (`"Cricket Secretary"`, `"Male"`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// The offices students elect, one race per category and gender.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SportCategory {
    #[serde(rename = "Volleyball Secretary Boys")]
    VolleyballSecretaryBoys,
    #[serde(rename = "Volleyball Secretary Girls")]
    VolleyballSecretaryGirls,
    #[serde(rename = "Cricket Secretary")]
    CricketSecretary,
    #[serde(rename = "Indoor Games Secretary")]
    IndoorGamesSecretary,
    #[serde(rename = "Overall Sports Secretary")]
    OverallSportsSecretary,
}

impl SportCategory {
    /// Every category, in dashboard order.
    pub const ALL: [SportCategory; 5] = [
        Self::VolleyballSecretaryBoys,
        Self::VolleyballSecretaryGirls,
        Self::CricketSecretary,
        Self::IndoorGamesSecretary,
        Self::OverallSportsSecretary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VolleyballSecretaryBoys => "Volleyball Secretary Boys",
            Self::VolleyballSecretaryGirls => "Volleyball Secretary Girls",
            Self::CricketSecretary => "Cricket Secretary",
            Self::IndoorGamesSecretary => "Indoor Games Secretary",
            Self::OverallSportsSecretary => "Overall Sports Secretary",
        }
    }

    /// Stable single-byte tag used in composite store keys.
    pub fn tag(&self) -> u8 {
        match self {
            Self::VolleyballSecretaryBoys => 0,
            Self::VolleyballSecretaryGirls => 1,
            Self::CricketSecretary => 2,
            Self::IndoorGamesSecretary => 3,
            Self::OverallSportsSecretary => 4,
        }
    }
}

impl fmt::Display for SportCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SportCategory {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| TypesError::UnknownCategory(s.to_string()))
    }
}

/// Candidate gender. Each category runs one race per gender.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Self::Male, Self::Female];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }

    pub fn tag(&self) -> u8 {
        match self {
            Self::Male => 0,
            Self::Female => 1,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            _ => Err(TypesError::UnknownGender(s.to_string())),
        }
    }
}

/// The unit of voting eligibility: one vote per pair per voter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VotingPair {
    pub category: SportCategory,
    pub gender: Gender,
}

impl VotingPair {
    pub fn new(category: SportCategory, gender: Gender) -> Self {
        Self { category, gender }
    }

    /// All ten pairs in dashboard order: category first, Male before Female.
    pub fn all() -> impl Iterator<Item = VotingPair> {
        SportCategory::ALL
            .into_iter()
            .flat_map(|c| Gender::ALL.into_iter().map(move |g| VotingPair::new(c, g)))
    }
}

impl fmt::Display for VotingPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.category, self.gender)
    }
}
