//! Snapshot store
//!
//! Holds the currently published registry document. Each successful sync
//! cycle builds a complete new [`Snapshot`] and swaps it in with a single
//! atomic pointer store, so readers see either the previous document or
//! the new one, never a mix. Reads are lock-free and never wait on a
//! fetch. Only the sync engine holds the [`SnapshotStore`]; everyone else
//! gets a [`SnapshotReader`].

use arc_swap::ArcSwapOption;
use chrono::{DateTime, Utc};
use claim_registry_core::ClaimRegistry;
use std::sync::Arc;

/// A published registry document and its publication metadata
#[derive(Debug)]
pub struct Snapshot {
    /// The registry document
    pub registry: Arc<ClaimRegistry>,

    /// When this snapshot was published
    pub synced_at: DateTime<Utc>,

    /// Number of snapshots published so far, this one included
    pub generation: u64,
}

/// Write side of the snapshot; owned by the sync engine
///
/// Not `Clone`: there is exactly one writer. Readers get a
/// [`SnapshotReader`] from [`SnapshotStore::reader`].
#[derive(Debug, Default)]
pub struct SnapshotStore {
    current: Arc<ArcSwapOption<Snapshot>>,
}

impl SnapshotStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only handle observing this store
    pub fn reader(&self) -> SnapshotReader {
        SnapshotReader {
            current: Arc::clone(&self.current),
        }
    }

    /// Publish `registry` as the new snapshot, replacing the previous one whole.
    ///
    /// Returns the generation of the published snapshot.
    pub fn replace(&self, registry: ClaimRegistry) -> u64 {
        let registry = Arc::new(registry);
        let mut published = 0;

        self.current.rcu(|current| {
            published = current.as_ref().map_or(0, |snapshot| snapshot.generation) + 1;
            Some(Arc::new(Snapshot {
                registry: Arc::clone(&registry),
                synced_at: Utc::now(),
                generation: published,
            }))
        });
        published
    }
}

/// Read-only handle to the current snapshot
///
/// Cloning clones the handle; all clones observe the same snapshot.
#[derive(Debug, Clone, Default)]
pub struct SnapshotReader {
    current: Arc<ArcSwapOption<Snapshot>>,
}

impl SnapshotReader {
    /// Current registry document, or `None` before the first successful sync
    pub fn read(&self) -> Option<Arc<ClaimRegistry>> {
        self.current
            .load_full()
            .map(|snapshot| Arc::clone(&snapshot.registry))
    }

    /// Current snapshot with its metadata
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.current.load_full()
    }

    /// Whether a snapshot has been published
    pub fn is_loaded(&self) -> bool {
        self.current.load_full().is_some()
    }

    /// Publication time of the current snapshot
    pub fn last_synced(&self) -> Option<DateTime<Utc>> {
        self.current.load_full().map(|snapshot| snapshot.synced_at)
    }

    /// Number of snapshots published so far
    pub fn generation(&self) -> u64 {
        self.current
            .load_full()
            .map_or(0, |snapshot| snapshot.generation)
    }
}
