//! Election errors.

use ballot_store::StoreError;
use ballot_types::{Gender, SportCategory};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ElectionError {
    /// Malformed or missing input.
    #[error("{0}")]
    Validation(String),

    #[error("{kind} {key} not found")]
    NotFound { kind: &'static str, key: String },

    /// Duplicate candidate or voter.
    #[error("{0}")]
    Conflict(String),

    #[error("you have already voted for {category} ({gender})")]
    AlreadyVoted {
        category: SportCategory,
        gender: Gender,
    },

    #[error("storage failure: {0}")]
    Store(StoreError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for ElectionError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { kind, key } => Self::NotFound { kind, key },
            StoreError::Duplicate { kind: "voter", .. } => {
                Self::Conflict("voter already registered".to_string())
            }
            StoreError::Duplicate { kind, .. } => Self::Conflict(format!("{kind} already exists")),
            other => Self::Store(other),
        }
    }
}
