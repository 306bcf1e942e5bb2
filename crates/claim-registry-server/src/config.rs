//! Server configuration
//!
//! This module handles hierarchical configuration loading from multiple sources:
//! - Default configuration file
//! - Environment-specific configuration file
//! - Environment variables
//! - Command-line arguments

use claim_registry_sync::{
    SyncConfig, DEFAULT_BASE_URL, DEFAULT_BRANCH, DEFAULT_REGISTRY_PATH,
};
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server settings
    #[serde(default)]
    pub server: HttpServerConfig,

    /// Registry source and sync settings
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// CORS settings
    #[serde(default)]
    pub cors: CorsConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to
    #[serde(default = "default_port")]
    pub port: u16,

    /// How long in-flight requests may take to finish after a shutdown signal
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_seconds: u64,

    /// Enable response compression
    #[serde(default = "default_true")]
    pub compression: bool,

    /// OpenAPI document served at `/openapi.yaml`
    #[serde(default = "default_openapi_path")]
    pub openapi_path: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_true() -> bool {
    true
}

fn default_shutdown_timeout() -> u64 {
    10
}

fn default_openapi_path() -> String {
    claim_registry_api::DEFAULT_OPENAPI_PATH.to_string()
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            shutdown_timeout_seconds: default_shutdown_timeout(),
            compression: default_true(),
            openapi_path: default_openapi_path(),
        }
    }
}

/// Registry source configuration
///
/// The access token is not read from configuration files; it only comes
/// from the command line or `GITHUB_TOKEN`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Repository slug (`owner/name`); required
    #[serde(default)]
    pub repository: String,

    /// Path of the registry file in the repository
    #[serde(default = "default_registry_path")]
    pub path: String,

    /// Branch or ref
    #[serde(default = "default_branch")]
    pub branch: String,

    /// Poll interval, e.g. `60s` or `5m`
    #[serde(default = "default_sync_interval")]
    pub sync_interval: String,

    /// Raw-content host
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Timeout for one fetch in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

fn default_registry_path() -> String {
    DEFAULT_REGISTRY_PATH.to_string()
}

fn default_branch() -> String {
    DEFAULT_BRANCH.to_string()
}

fn default_sync_interval() -> String {
    "60s".to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            repository: String::new(),
            path: default_registry_path(),
            branch: default_branch(),
            sync_interval: default_sync_interval(),
            base_url: default_base_url(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl RegistryConfig {
    /// Build and validate the sync engine configuration
    pub fn to_sync_config(
        &self,
        token: Option<&str>,
    ) -> Result<SyncConfig, claim_registry_sync::ConfigError> {
        let mut sync = SyncConfig::new(self.repository.trim())
            .with_path(self.path.clone())
            .with_branch(self.branch.clone())
            .with_base_url(self.base_url.clone())
            .with_request_timeout(Duration::from_secs(self.request_timeout_seconds))
            .with_interval_str(&self.sync_interval)?;

        if let Some(token) = token {
            sync = sync.with_token(token);
        }

        sync.validate()?;
        Ok(sync)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or filter directive (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Use JSON formatting
    #[serde(default)]
    pub json_format: bool,

    /// Include timestamps
    #[serde(default = "default_true")]
    pub include_timestamps: bool,

    /// Include thread IDs
    #[serde(default)]
    pub include_thread_ids: bool,

    /// Include target module
    #[serde(default = "default_true")]
    pub include_target: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
            include_timestamps: true,
            include_thread_ids: false,
            include_target: true,
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Allowed origins (empty means all)
    #[serde(default)]
    pub allowed_origins: Vec<String>,

    /// Max age for preflight requests in seconds
    #[serde(default = "default_cors_max_age")]
    pub max_age_seconds: u64,
}

fn default_cors_max_age() -> u64 {
    3600
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![],
            max_age_seconds: default_cors_max_age(),
        }
    }
}

impl CorsConfig {
    /// Convert to the API layer's CORS settings
    pub fn to_api_config(&self) -> claim_registry_api::CorsConfig {
        claim_registry_api::CorsConfig {
            allowed_origins: self.allowed_origins.clone(),
            max_age_seconds: Some(self.max_age_seconds),
        }
    }
}

impl ServerConfig {
    /// Load configuration from files and environment
    ///
    /// Configuration is loaded in the following order (later sources override earlier):
    /// 1. Default configuration file (config/default.toml)
    /// 2. Environment-specific file (config/{env}.toml)
    /// 3. Environment variables (CLAIM_REGISTRY__*)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or parsed
    pub fn load(config_dir: impl Into<PathBuf>, environment: &str) -> Result<Self, ConfigError> {
        let config_dir = config_dir.into();

        let config = Config::builder()
            // Start with default config
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Add environment-specific config
            .add_source(File::from(config_dir.join(format!("{}.toml", environment))).required(false))
            // e.g., CLAIM_REGISTRY__SERVER__PORT=8080
            .add_source(
                Environment::with_prefix("CLAIM_REGISTRY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Get server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
