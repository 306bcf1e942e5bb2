//! Service-layer error types
//!
//! Maps snapshot and lookup outcomes to the errors the API layer renders.

use thiserror::Error;

/// Result type alias for service operations
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// Service-layer error types
#[derive(Error, Debug)]
pub enum ServiceError {
    /// No snapshot has been published yet
    #[error("registry not yet loaded")]
    NotLoaded,

    /// No claim with the given name
    #[error("Claim not found: {0}")]
    NotFound(String),

    /// Failure inside a custom query service implementation
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn is_not_loaded(&self) -> bool {
        matches!(self, ServiceError::NotLoaded)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::NotFound(_))
    }
}
