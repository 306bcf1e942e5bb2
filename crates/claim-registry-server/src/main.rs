//! Claim Registry Server
//!
//! Main entry point for the Claim Registry HTTP server.
//! This binary loads the registry document, keeps it in sync in the
//! background and serves it over HTTP with graceful shutdown.

mod config;
mod telemetry;

use anyhow::{Context, Result};
use axum::Router;
use clap::Parser;
use claim_registry_api::{build_api_server_with_state, AppState, MiddlewareConfig};
use claim_registry_service::ServiceRegistry;
use claim_registry_sync::Syncer;
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use config::ServerConfig;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration directory
    #[arg(short, long, env = "CONFIG_DIR", default_value = "config")]
    config_dir: String,

    /// Environment (development, production, etc.)
    #[arg(short, long, env = "ENVIRONMENT", default_value = "development")]
    environment: String,

    /// Repository holding the registry file (owner/name)
    #[arg(long, env = "REGISTRY_REPO")]
    repo: Option<String>,

    /// Path of the registry file in the repository
    #[arg(long, env = "REGISTRY_PATH")]
    registry_path: Option<String>,

    /// Branch to read the registry file from
    #[arg(long, env = "REGISTRY_BRANCH")]
    branch: Option<String>,

    /// Background sync interval, e.g. 60s or 5m
    #[arg(long, env = "SYNC_INTERVAL")]
    sync_interval: Option<String>,

    /// Access token for private repositories
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Raw-content host
    #[arg(long, env = "REGISTRY_BASE_URL")]
    base_url: Option<String>,

    /// Server host
    #[arg(long, env = "SERVER_HOST")]
    host: Option<String>,

    /// Server port
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Server port (fallback when PORT is unset)
    #[arg(long, env = "SERVER_PORT", hide = true)]
    server_port: Option<u16>,

    /// Log level
    #[arg(long, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Log format; `json` for one JSON object per line
    #[arg(long, env = "LOG_FORMAT")]
    log_format: Option<String>,
}

impl Args {
    /// Apply command-line and environment overrides on top of file configuration
    fn apply(&self, config: &mut ServerConfig) {
        if let Some(repo) = &self.repo {
            config.registry.repository = repo.clone();
        }
        if let Some(path) = &self.registry_path {
            config.registry.path = path.clone();
        }
        if let Some(branch) = &self.branch {
            config.registry.branch = branch.clone();
        }
        if let Some(interval) = &self.sync_interval {
            config.registry.sync_interval = interval.clone();
        }
        if let Some(base_url) = &self.base_url {
            config.registry.base_url = base_url.clone();
        }
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port.or(self.server_port) {
            config.server.port = port;
        }
        if let Some(log_level) = &self.log_level {
            config.logging.level = log_level.clone();
        }
        if let Some(format) = &self.log_format {
            config.logging.json_format = telemetry::is_json_format(format);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let args = Args::parse();

    // Load configuration; missing files fall back to defaults, broken ones abort
    let mut config = ServerConfig::load(&args.config_dir, &args.environment)
        .context("Failed to load configuration")?;
    args.apply(&mut config);

    // Initialize telemetry
    let telemetry_config = telemetry::TelemetryConfig::new()
        .with_log_level(config.logging.level.clone())
        .with_json_format(config.logging.json_format)
        .with_timestamps(config.logging.include_timestamps)
        .with_thread_ids(config.logging.include_thread_ids)
        .with_target(config.logging.include_target);

    telemetry::init_with_config(telemetry_config).context("Failed to initialize logging")?;

    info!("Starting Claim Registry Server v{}", env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", args.environment);

    let sync_config = config
        .registry
        .to_sync_config(args.token.as_deref())
        .context("Invalid registry configuration (is REGISTRY_REPO set?)")?;

    info!("Registry: {}", sync_config.location());
    info!(
        "Sync: every {}",
        humantime::format_duration(sync_config.interval)
    );
    info!(
        "Token: {}",
        if sync_config.token.is_some() { "set" } else { "not set" }
    );

    // Load the registry before accepting traffic
    let mut syncer = Syncer::new(sync_config).context("Failed to create syncer")?;
    syncer.initial_sync().await.context("Initial sync failed")?;
    syncer.start().context("Failed to start background sync")?;

    let app = build_app(&config, &syncer);

    // Parse HTTP bind address
    let http_addr: SocketAddr = config
        .bind_address()
        .parse()
        .context("Invalid HTTP bind address")?;

    let http_listener = tokio::net::TcpListener::bind(http_addr)
        .await
        .context("Failed to bind HTTP server")?;

    info!("HTTP Server listening on http://{}", http_addr);

    let serve_result = serve(
        http_listener,
        app,
        Duration::from_secs(config.server.shutdown_timeout_seconds),
    )
    .await;

    // HTTP is down; stop polling before exiting
    syncer.stop().await;

    serve_result?;
    info!("Server shutdown complete");
    Ok(())
}

/// Build the HTTP application over the syncer's snapshot
fn build_app(config: &ServerConfig, syncer: &Syncer) -> Router {
    let services = ServiceRegistry::new(syncer.reader());
    let state = AppState::new(services)
        .with_monitor(syncer.monitor())
        .with_openapi_path(config.server.openapi_path.clone());

    let middleware_config = MiddlewareConfig::new()
        .with_cors(config.cors.to_api_config())
        .with_compression(config.server.compression);

    build_api_server_with_state(state, middleware_config)
}

/// Serve until a shutdown signal arrives, then drain for at most `drain_timeout`
async fn serve(listener: tokio::net::TcpListener, app: Router, drain_timeout: Duration) -> Result<()> {
    let shutdown = CancellationToken::new();

    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        signal_token.cancel();
    });

    let graceful_token = shutdown.clone();
    let server = axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async move { graceful_token.cancelled().await })
        .into_future();

    tokio::select! {
        result = server => result.context("HTTP Server error"),
        _ = async {
            shutdown.cancelled().await;
            tokio::time::sleep(drain_timeout).await;
        } => {
            warn!("Graceful shutdown timed out after {:?}; dropping open connections", drain_timeout);
            Ok(())
        }
    }
}

/// Graceful shutdown signal handler
///
/// Waits for SIGTERM or SIGINT (Ctrl+C).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
