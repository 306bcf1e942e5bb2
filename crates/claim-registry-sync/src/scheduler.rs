//! Sync scheduler
//!
//! Lifecycle: `Uninitialized -> Running -> Stopped`.
//!
//! - [`Syncer::initial_sync`] runs one fetch, parse and store cycle and
//!   returns its error to the caller. Startup should fail on it.
//! - [`Syncer::start`] spawns the background loop, which repeats the cycle
//!   on a fixed interval. A failed cycle is logged and the previous
//!   snapshot stays published.
//! - [`Syncer::stop`] cancels the loop and waits for the task to exit. No
//!   fetch is issued after it returns. Stopped is terminal.

use chrono::{DateTime, Utc};
use claim_registry_core::parse;
use secrecy::SecretString;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::config::{RegistryLocation, SyncConfig};
use crate::error::{SyncError, SyncResult};
use crate::fetcher::{HttpFetcher, RegistryFetcher};
use crate::snapshot::{SnapshotReader, SnapshotStore};

/// Lifecycle state of a [`Syncer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Created; the background loop has not been started
    Uninitialized,
    /// Background loop running
    Running,
    /// Stopped for good
    Stopped,
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "uninitialized"),
            Self::Running => write!(f, "running"),
            Self::Stopped => write!(f, "stopped"),
        }
    }
}

/// Point-in-time view of sync activity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncStatus {
    pub state: SyncState,
    pub successful_cycles: u64,
    pub failed_cycles: u64,
    pub last_success_at: Option<DateTime<Utc>>,
    pub last_failure_at: Option<DateTime<Utc>>,

    /// Error of the most recent cycle, cleared by the next success
    pub last_error: Option<String>,
}

impl Default for SyncStatus {
    fn default() -> Self {
        Self {
            state: SyncState::Uninitialized,
            successful_cycles: 0,
            failed_cycles: 0,
            last_success_at: None,
            last_failure_at: None,
            last_error: None,
        }
    }
}

impl SyncStatus {
    /// Whether the most recent cycle failed
    pub fn is_failing(&self) -> bool {
        self.last_error.is_some()
    }
}

/// Shared, read-only view of a syncer's activity for health reporting
#[derive(Debug, Clone, Default)]
pub struct SyncMonitor {
    status: Arc<Mutex<SyncStatus>>,
}

impl SyncMonitor {
    /// Current status
    pub fn status(&self) -> SyncStatus {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, SyncStatus> {
        self.status.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, state: SyncState) {
        self.lock().state = state;
    }

    fn record_success(&self) {
        let mut status = self.lock();
        status.successful_cycles += 1;
        status.last_success_at = Some(Utc::now());
        status.last_error = None;
    }

    fn record_failure(&self, err: &SyncError) {
        let mut status = self.lock();
        status.failed_cycles += 1;
        status.last_failure_at = Some(Utc::now());
        status.last_error = Some(err.to_string());
    }
}

/// Everything one sync cycle needs; shared with the background task
struct SyncWorker {
    fetcher: Arc<dyn RegistryFetcher>,
    location: RegistryLocation,
    token: Option<SecretString>,
    store: SnapshotStore,
    monitor: SyncMonitor,
}

impl SyncWorker {
    /// Fetch, parse and publish; returns the number of claims published
    async fn cycle(&self) -> SyncResult<usize> {
        let outcome = self.fetch_and_store().await;
        match &outcome {
            Ok(_) => self.monitor.record_success(),
            Err(err) => self.monitor.record_failure(err),
        }
        outcome
    }

    async fn fetch_and_store(&self) -> SyncResult<usize> {
        let data = self
            .fetcher
            .fetch(&self.location, self.token.as_ref())
            .await?;
        let registry = parse(&data)?;
        let count = registry.len();
        self.store.replace(registry);
        Ok(count)
    }
}

/// Keeps a [`SnapshotStore`] in sync with the remote registry document
///
/// The syncer owns the only writable handle to its store; the background
/// loop is its sole writer once running.
pub struct Syncer {
    config: SyncConfig,
    worker: Arc<SyncWorker>,
    state: SyncState,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl Syncer {
    /// Create a syncer that fetches over HTTP
    ///
    /// Fails with a configuration error when the repository is missing or a
    /// duration is not positive.
    pub fn new(config: SyncConfig) -> SyncResult<Self> {
        config.validate()?;
        let fetcher = HttpFetcher::new(config.request_timeout)?;
        Ok(Self::assemble(config, Arc::new(fetcher)))
    }

    /// Create a syncer with a custom fetcher
    pub fn with_fetcher(config: SyncConfig, fetcher: Arc<dyn RegistryFetcher>) -> SyncResult<Self> {
        config.validate()?;
        Ok(Self::assemble(config, fetcher))
    }

    /// Wire up a syncer from an already validated configuration
    fn assemble(config: SyncConfig, fetcher: Arc<dyn RegistryFetcher>) -> Self {
        let worker = Arc::new(SyncWorker {
            fetcher,
            location: config.location(),
            token: config.token.clone(),
            store: SnapshotStore::new(),
            monitor: SyncMonitor::default(),
        });

        Self {
            config,
            worker,
            state: SyncState::Uninitialized,
            cancel: CancellationToken::new(),
            handle: None,
        }
    }

    /// Configuration this syncer was built with
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Current lifecycle state
    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Read-only handle to the published snapshot
    pub fn reader(&self) -> SnapshotReader {
        self.worker.store.reader()
    }

    /// Handle for observing sync activity
    pub fn monitor(&self) -> SyncMonitor {
        self.worker.monitor.clone()
    }

    /// Run the first sync cycle; returns the number of claims loaded.
    ///
    /// Errors are returned as-is so the caller can refuse to start. May be
    /// retried while the syncer is still uninitialized.
    #[instrument(skip(self), fields(url = %self.config.raw_url()))]
    pub async fn initial_sync(&mut self) -> SyncResult<usize> {
        self.expect_state("initial_sync", SyncState::Uninitialized)?;

        let count = self.worker.cycle().await?;
        info!(
            "Initial sync complete: {} claims loaded from {}",
            count,
            self.config.location()
        );
        Ok(count)
    }

    /// Start the background polling loop.
    ///
    /// Requires a loaded snapshot, i.e. a successful [`Syncer::initial_sync`].
    /// Must be called from within a Tokio runtime.
    pub fn start(&mut self) -> SyncResult<()> {
        self.expect_state("start", SyncState::Uninitialized)?;
        if !self.worker.store.reader().is_loaded() {
            return Err(SyncError::NotReady);
        }

        let worker = Arc::clone(&self.worker);
        let cancel = self.cancel.clone();
        let interval = self.config.interval;
        self.handle = Some(tokio::spawn(run_loop(worker, interval, cancel)));

        self.state = SyncState::Running;
        self.worker.monitor.set_state(SyncState::Running);
        info!(interval = ?interval, "Background sync started");
        Ok(())
    }

    /// Stop the background loop and wait for it to exit.
    ///
    /// An in-flight fetch is abandoned. Calling `stop` again is a no-op.
    pub async fn stop(&mut self) {
        if self.state == SyncState::Stopped {
            return;
        }

        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                warn!(error = %e, "Background sync task ended abnormally");
            }
        }

        self.state = SyncState::Stopped;
        self.worker.monitor.set_state(SyncState::Stopped);
        info!("Background sync stopped");
    }

    fn expect_state(&self, operation: &'static str, expected: SyncState) -> SyncResult<()> {
        if self.state != expected {
            return Err(SyncError::InvalidState {
                operation,
                state: self.state,
            });
        }
        Ok(())
    }
}

impl Drop for Syncer {
    fn drop(&mut self) {
        // Dropped without stop(): make sure the loop does not outlive us
        self.cancel.cancel();
    }
}

impl fmt::Debug for Syncer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Syncer")
            .field("config", &self.config)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

async fn run_loop(worker: Arc<SyncWorker>, interval: Duration, cancel: CancellationToken) {
    // The initial sync already ran; the first background cycle is one interval out
    let mut ticker = time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            outcome = worker.cycle() => outcome,
        };

        match outcome {
            Ok(count) => info!("Sync complete: {} claims", count),
            Err(e) => warn!(error = %e, "Sync failed; keeping previous snapshot"),
        }
    }

    debug!("Sync loop exited");
}
