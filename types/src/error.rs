//! Top-level error type shared across crates.

use thiserror::Error;

/// Errors raised while parsing or constructing the fundamental types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid candidate id: {0}")]
    InvalidCandidateId(String),

    #[error("invalid voter id: {0:?}")]
    InvalidVoterId(String),

    #[error("unknown sport category: {0}")]
    UnknownCategory(String),

    #[error("unknown gender: {0}")]
    UnknownGender(String),

    #[error("unknown role: {0}")]
    UnknownRole(String),

    #[error("entropy source unavailable: {0}")]
    Entropy(String),
}
