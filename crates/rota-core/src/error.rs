//! Error types for the Rota core model.

use thiserror::Error;

/// Errors that can occur while parsing or decoding the permission model.
///
/// Note that a malformed scope value is *not* an error: it decodes to
/// [`Scope::None`](crate::Scope::None).
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown role: {0}")]
    UnknownRole(String),

    #[error("unknown permission kind: {0}")]
    UnknownPermissionKind(String),

    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("decoding error: {0}")]
    DecodingError(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
