//! Record types and abstract storage traits for the ballot service.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The rest of the codebase depends only on the traits.

pub mod ballot;
pub mod candidate;
pub mod error;
pub mod meta;
pub mod voter;

pub use ballot::{BallotStore, CascadeReport, VoteOutcome};
pub use candidate::{normalize_name, Candidate, CandidateStore, DEFAULT_PHOTO, MAX_NAME_LEN};
pub use error::StoreError;
pub use meta::MetaStore;
pub use voter::{LedgerEntry, Voter, VoterStore};
