//! Telemetry and tracing configuration
//!
//! Structured logging for the Claim Registry server. `LOG_FORMAT=json`
//! switches to one JSON object per line for log shippers.

use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError, EnvFilter, Layer,
};

/// Telemetry configuration
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Log level or filter directive
    pub log_level: String,

    /// Whether to use JSON formatting
    pub json_format: bool,

    /// Whether to include timestamps
    pub include_timestamps: bool,

    /// Whether to include thread IDs
    pub include_thread_ids: bool,

    /// Whether to include target module
    pub include_target: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_format: false,
            include_timestamps: true,
            include_thread_ids: false,
            include_target: true,
        }
    }
}

impl TelemetryConfig {
    /// Create a new telemetry config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Enable JSON formatting
    pub fn with_json_format(mut self, enabled: bool) -> Self {
        self.json_format = enabled;
        self
    }

    /// Configure timestamp inclusion
    pub fn with_timestamps(mut self, enabled: bool) -> Self {
        self.include_timestamps = enabled;
        self
    }

    /// Configure thread ID inclusion
    pub fn with_thread_ids(mut self, enabled: bool) -> Self {
        self.include_thread_ids = enabled;
        self
    }

    /// Configure target module inclusion
    pub fn with_target(mut self, enabled: bool) -> Self {
        self.include_target = enabled;
        self
    }

    /// Filter built from the configured level; an unparsable level falls back to `info`
    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.log_level).unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Whether a `LOG_FORMAT` value selects JSON output
pub fn is_json_format(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("json")
}

/// Install the global subscriber
///
/// Fails if a subscriber is already installed.
pub fn init_with_config(config: TelemetryConfig) -> Result<(), TryInitError> {
    let env_filter = config.env_filter();

    let fmt_layer = if config.json_format {
        // JSON formatting for production
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_target(config.include_target)
            .with_thread_ids(config.include_thread_ids)
            .boxed()
    } else if config.include_timestamps {
        fmt::layer()
            .with_target(config.include_target)
            .with_thread_ids(config.include_thread_ids)
            .boxed()
    } else {
        fmt::layer()
            .without_time()
            .with_target(config.include_target)
            .with_thread_ids(config.include_thread_ids)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .try_init()
}
