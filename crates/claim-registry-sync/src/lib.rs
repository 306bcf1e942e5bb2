//! Snapshot synchronization for the Claim Registry
//!
//! This crate keeps an in-memory copy of the registry document in sync with
//! the file hosted in source control:
//! - [`SyncConfig`] describes where the document lives and how often to poll
//! - [`HttpFetcher`] retrieves the raw document (one GET, bounded timeout)
//! - [`SnapshotStore`] publishes complete documents with an atomic swap
//! - [`Syncer`] runs the initial sync and the background polling loop
//!
//! Readers hold a [`SnapshotReader`]; they never wait on a fetch and cannot
//! publish.
//!
//! # Example
//!
//! ```rust,no_run
//! use claim_registry_sync::{SyncConfig, Syncer};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SyncConfig::new("stuttgart-things/harvester").with_branch("main");
//! let mut syncer = Syncer::new(config)?;
//!
//! // Fail fast if the document cannot be loaded at startup
//! syncer.initial_sync().await?;
//! syncer.start()?;
//!
//! let reader = syncer.reader();
//! let claims = reader.read().map(|registry| registry.len()).unwrap_or(0);
//! println!("{} claims loaded", claims);
//!
//! syncer.stop().await;
//! # Ok(())
//! # }
//! ```

// Re-export core domain types for convenience
pub use claim_registry_core;

pub mod config;
pub mod error;
pub mod fetcher;
pub mod scheduler;
pub mod snapshot;

// Re-exports for convenience
pub use config::{
    parse_interval, RegistryLocation, SyncConfig, DEFAULT_BASE_URL, DEFAULT_BRANCH,
    DEFAULT_REGISTRY_PATH, DEFAULT_REQUEST_TIMEOUT, DEFAULT_SYNC_INTERVAL,
};
pub use error::{ConfigError, FetchError, SyncError, SyncResult};
pub use fetcher::{HttpFetcher, RegistryFetcher};
pub use scheduler::{SyncMonitor, SyncState, SyncStatus, Syncer};
pub use snapshot::{Snapshot, SnapshotReader, SnapshotStore};

/// Sync layer version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
