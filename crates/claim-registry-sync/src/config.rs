//! Sync configuration
//!
//! Describes where the registry document lives and how the engine polls
//! it. Only the repository identifier is mandatory; everything else has a
//! default matching the public GitHub raw-content layout.

use secrecy::SecretString;
use std::fmt;
use std::time::Duration;
use url::Url;

use crate::error::ConfigError;

/// Default raw-content host
pub const DEFAULT_BASE_URL: &str = "https://raw.githubusercontent.com";

/// Default path of the registry file inside the repository
pub const DEFAULT_REGISTRY_PATH: &str = "claims/registry.yaml";

/// Default branch
pub const DEFAULT_BRANCH: &str = "main";

/// Default poll interval (60 seconds)
pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_secs(60);

/// Timeout for a single fetch (30 seconds)
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Sync engine configuration
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Repository slug, e.g. `stuttgart-things/harvester`
    pub repository: String,

    /// Path of the registry file in the repository
    pub path: String,

    /// Branch or ref
    pub branch: String,

    /// Background poll interval
    pub interval: Duration,

    /// Optional access token for private repositories
    pub token: Option<SecretString>,

    /// Raw-content host, overridable for testing
    pub base_url: String,

    /// Timeout applied to each fetch
    pub request_timeout: Duration,
}

impl SyncConfig {
    /// Create a configuration for `repository` with all other values defaulted
    pub fn new(repository: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            path: DEFAULT_REGISTRY_PATH.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
            interval: DEFAULT_SYNC_INTERVAL,
            token: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Set the registry file path
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Set the branch
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    /// Set the poll interval
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set the poll interval from a human duration such as `60s` or `1m30s`
    pub fn with_interval_str(self, value: &str) -> Result<Self, ConfigError> {
        let interval = parse_interval(value)?;
        Ok(self.with_interval(interval))
    }

    /// Set the access token; an empty token is treated as none
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.token = if token.is_empty() {
            None
        } else {
            Some(SecretString::new(token))
        };
        self
    }

    /// Override the raw-content host
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the per-fetch timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Check required values and ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.repository.trim().is_empty() {
            return Err(ConfigError::MissingRepository);
        }

        if self.interval.is_zero() {
            return Err(ConfigError::InvalidInterval {
                value: humantime::format_duration(self.interval).to_string(),
                reason: "must be a positive duration".to_string(),
            });
        }

        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout);
        }

        let url = Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                url: self.base_url.clone(),
                reason: format!("unsupported scheme {}", url.scheme()),
            });
        }

        Ok(())
    }

    /// Location of the registry document
    pub fn location(&self) -> RegistryLocation {
        RegistryLocation {
            base_url: self.base_url.clone(),
            repository: self.repository.clone(),
            branch: self.branch.clone(),
            path: self.path.clone(),
        }
    }

    /// Resolved raw-content URL of the registry document
    pub fn raw_url(&self) -> String {
        self.location().url()
    }
}

/// The four parts that address the registry document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryLocation {
    pub base_url: String,
    pub repository: String,
    pub branch: String,
    pub path: String,
}

impl RegistryLocation {
    /// `{base_url}/{repository}/{branch}/{path}`
    pub fn url(&self) -> String {
        format!(
            "{}/{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.repository,
            self.branch,
            self.path
        )
    }
}

impl fmt::Display for RegistryLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.repository, self.path, self.branch)
    }
}

/// Parse a poll interval such as `60s`, `1m`, `50ms` or `1m30s`.
///
/// Every unit takes a whole number: write `90s` or `1m30s`, not `1.5m`.
/// Zero is rejected.
pub fn parse_interval(value: &str) -> Result<Duration, ConfigError> {
    if value.contains('.') {
        return Err(ConfigError::InvalidInterval {
            value: value.to_string(),
            reason: "fractional units are not supported; use e.g. 1m30s".to_string(),
        });
    }

    let interval = humantime::parse_duration(value.trim()).map_err(|e| {
        ConfigError::InvalidInterval {
            value: value.to_string(),
            reason: e.to_string(),
        }
    })?;

    if interval.is_zero() {
        return Err(ConfigError::InvalidInterval {
            value: value.to_string(),
            reason: "must be a positive duration".to_string(),
        });
    }

    Ok(interval)
}
