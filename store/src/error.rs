use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} {key} not found")]
    NotFound { kind: &'static str, key: String },

    #[error("duplicate {kind}: {key}")]
    Duplicate { kind: &'static str, key: String },

    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("database is corrupted: {0}")]
    Corruption(String),
}

impl StoreError {
    pub fn candidate_not_found(key: impl ToString) -> Self {
        Self::NotFound {
            kind: "candidate",
            key: key.to_string(),
        }
    }

    pub fn voter_not_found(key: impl ToString) -> Self {
        Self::NotFound {
            kind: "voter",
            key: key.to_string(),
        }
    }
}
