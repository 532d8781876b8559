//! The college sports election engine.
//!
//! Each voter casts one vote per (sport category, gender) pair. Every
//! candidate's tally equals the number of voter ledger entries naming it;
//! the engine keeps that true by delegating each multi-record change to a
//! single [`BallotStore`](ballot_store::BallotStore) operation.
//!
//! Admin privilege is enforced by the HTTP layer, not here.

pub mod audit;
pub mod draft;
pub mod engine;
pub mod error;
pub mod query;
pub mod results;
pub mod seed;

pub use audit::{DanglingEntry, TallyAudit, TallyDrift};
pub use draft::CandidateDraft;
pub use engine::Election;
pub use error::ElectionError;
pub use query::{CandidateView, CreatorRef};
pub use results::RaceResult;
pub use seed::SeedReport;
