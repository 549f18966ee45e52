use thiserror::Error;

/// Failures reported by a [`GovernanceStore`](crate::GovernanceStore) backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No proposal, vote record, or metadata under the requested key.
    #[error("key not found: {0}")]
    NotFound(String),

    /// A write would overwrite an existing vote record with different contents.
    #[error("duplicate key: {0}")]
    Duplicate(String),

    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}
