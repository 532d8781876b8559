//! Fundamental types for the ballot election service.
//!
//! This crate defines the types shared across every other crate in the
//! workspace: record identifiers, the closed sport-category and gender
//! enumerations that make up a voting pair, voter roles, and timestamps.

pub mod category;
pub mod error;
pub mod id;
pub mod role;
pub mod time;
pub mod voter;

pub use category::{Gender, SportCategory, VotingPair};
pub use error::TypesError;
pub use id::CandidateId;
pub use role::Role;
pub use time::Timestamp;
pub use voter::VoterId;
