//! API error handling
//!
//! This module converts service errors into HTTP responses with appropriate
//! status codes and error messages.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use claim_registry_service::ServiceError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// API error type that can be converted to HTTP responses
#[derive(Debug)]
pub struct ApiError {
    status_code: StatusCode,
    message: String,
    error_code: Option<String>,
}

impl ApiError {
    /// Create an API error with an error code
    pub fn with_code(
        status_code: StatusCode,
        message: impl Into<String>,
        error_code: impl Into<String>,
    ) -> Self {
        Self {
            status_code,
            message: message.into(),
            error_code: Some(error_code.into()),
        }
    }

    /// HTTP status of this error
    pub fn status_code(&self) -> StatusCode {
        self.status_code
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

/// Error response JSON structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// HTTP status code
    pub status: u16,

    /// Error message
    pub error: String,

    /// Optional error code for programmatic handling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Timestamp of the error
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl ErrorResponse {
    pub fn new(status_code: StatusCode, error: impl Into<String>, code: Option<String>) -> Self {
        Self {
            status: status_code.as_u16(),
            error: error.into(),
            code,
            timestamp: chrono::Utc::now(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_response = ErrorResponse::new(self.status_code, self.message, self.error_code);
        (self.status_code, Json(error_response)).into_response()
    }
}

/// Convert ServiceError to ApiError
impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotLoaded => ApiError::with_code(
                StatusCode::SERVICE_UNAVAILABLE,
                "registry not yet loaded",
                "NOT_LOADED",
            ),
            ServiceError::NotFound(_) => {
                ApiError::with_code(StatusCode::NOT_FOUND, "claim not found", "NOT_FOUND")
            }
            ServiceError::Internal(msg) => ApiError::with_code(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Internal error: {}", msg),
                "INTERNAL_ERROR",
            ),
        }
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
