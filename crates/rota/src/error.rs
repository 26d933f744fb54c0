//! Error types for the access-control layer.

use rota_store::StoreError;
use thiserror::Error;

use crate::validator::Rejection;

/// Errors that can occur during access-control operations.
#[derive(Debug, Error)]
pub enum AccessError {
    /// The validator declined a commit. The store has already rolled back.
    #[error("validation rejected: {0}")]
    ValidationRejected(#[from] Rejection),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// The actor lacks the capability required for the operation.
    #[error("not authorized: {0}")]
    NotAuthorized(String),
}

/// Result type for access-control operations.
pub type Result<T> = std::result::Result<T, AccessError>;
