//! Metadata storage trait.

use crate::StoreError;

/// Internal bookkeeping that doesn't belong to candidates or voters.
pub trait MetaStore {
    /// Current database schema version; `0` for a fresh database.
    fn schema_version(&self) -> Result<u32, StoreError>;

    fn set_schema_version(&self, version: u32) -> Result<(), StoreError>;
}
