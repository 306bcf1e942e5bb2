//! Sync-specific error types
//!
//! Three families, with different handling:
//! - [`ConfigError`]: fatal at construction or startup
//! - [`FetchError`]: network or HTTP failure of one sync cycle
//! - parse failures ([`RegistryError`]) of one sync cycle
//!
//! Cycle failures abort the initial sync but are only logged by the
//! background loop, which keeps serving the last good snapshot.

use claim_registry_core::RegistryError;
use thiserror::Error;

use crate::scheduler::SyncState;

/// Result type alias for sync operations
pub type SyncResult<T> = Result<T, SyncError>;

/// Missing or invalid configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Repository identifier not provided
    #[error("Registry repository is required")]
    MissingRepository,

    /// Poll interval could not be parsed or is not positive
    #[error("Invalid sync interval {value:?}: {reason}")]
    InvalidInterval { value: String, reason: String },

    /// Request timeout is zero
    #[error("Request timeout must be a positive duration")]
    InvalidTimeout,

    /// Base address is not an http(s) URL
    #[error("Invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The HTTP client could not be built
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Failure to retrieve the remote document
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered with something other than 200 OK
    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    /// DNS, connection or timeout failure
    #[error("Failed to fetch registry from {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response body could not be read
    #[error("Failed to read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The credential cannot be sent as a header value
    #[error("Credential is not a valid header value")]
    InvalidCredential,
}

impl FetchError {
    /// HTTP status code, when the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the request ran into the client timeout
    pub fn is_timeout(&self) -> bool {
        match self {
            FetchError::Transport { source, .. } | FetchError::Body { source, .. } => {
                source.is_timeout()
            }
            _ => false,
        }
    }
}

/// Errors raised by the sync engine
#[derive(Debug, Error)]
pub enum SyncError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Fetch error
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Malformed registry document
    #[error(transparent)]
    Parse(#[from] RegistryError),

    /// Operation not allowed in the current lifecycle state
    #[error("Operation {operation} not allowed while syncer is {state}")]
    InvalidState {
        operation: &'static str,
        state: SyncState,
    },

    /// Background loop requested before any snapshot was loaded
    #[error("No snapshot loaded; run the initial sync first")]
    NotReady,
}

impl SyncError {
    pub fn is_config(&self) -> bool {
        matches!(self, SyncError::Config(_))
    }

    pub fn is_fetch(&self) -> bool {
        matches!(self, SyncError::Fetch(_))
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, SyncError::Parse(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_status_error_message() {
        let err = FetchError::Status {
            status: 404,
            url: "http://localhost/test/repo/main/claims/registry.yaml".to_string(),
        };
        assert_eq!(err.status(), Some(404));
        assert!(!err.is_timeout());
        assert_eq!(
            err.to_string(),
            "Unexpected status 404 from http://localhost/test/repo/main/claims/registry.yaml"
        );
    }

    #[test]
    fn test_sync_error_classification() {
        let err: SyncError = ConfigError::MissingRepository.into();
        assert!(err.is_config());
        assert!(!err.is_fetch());

        let err: SyncError = RegistryError::Parse("bad".to_string()).into();
        assert!(err.is_parse());
        assert_eq!(err.to_string(), "Parse error: bad");
    }

    #[test]
    fn test_invalid_state_message() {
        let err = SyncError::InvalidState {
            operation: "start",
            state: SyncState::Stopped,
        };
        assert_eq!(
            err.to_string(),
            "Operation start not allowed while syncer is stopped"
        );
    }
}
