//! Error types for the shiftspace core.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Permission denied: {reason}")]
    PermissionDenied { reason: String },

    #[error("Operation timed out: {operation}")]
    Timeout { operation: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Remote store error: {0}")]
    Store(String),

    #[error("Cryptography error: {0}")]
    Crypto(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
