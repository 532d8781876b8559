//! LMDB storage backend for the ballot service.
//!
//! Implements every storage trait from `ballot-store` on a single
//! [`LmdbEnvironment`] using the `heed` LMDB bindings. Records are encoded
//! with `bincode`.

pub mod ballot;
pub mod candidate;
pub mod environment;
pub mod error;
pub mod integrity;
pub mod meta;
pub mod migration;
pub mod voter;

pub use environment::{LmdbEnvironment, DEFAULT_MAP_SIZE};
pub use error::LmdbError;
pub use integrity::IntegrityReport;
