//! Typed error enum for the service layer.

use chatlog_storage::StorageError;
use thiserror::Error;

/// Service-layer error unifying storage and credential failures.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Storage operation failed (connection, query, decoding).
    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    /// Credential source is misconfigured or unreachable.
    #[error("credentials: {0}")]
    Credentials(String),
}

impl ServiceError {
    /// Whether this error is likely transient.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Storage(e) => e.is_transient(),
            Self::Credentials(_) => false,
        }
    }
}
