//! Memoized snapshots.

use crate::collector::{Collector, DetectOptions, ProbeConfig};
use iosprobe_schema::Snapshot;
use std::sync::{Arc, LazyLock};
use tokio::sync::Mutex;
use tracing::debug;

static PROCESS_CACHE: LazyLock<SnapshotCache> = LazyLock::new(SnapshotCache::new);

/// Holds at most one snapshot; the first probe fills it.
///
/// Later calls return the stored snapshot as is, whatever options they
/// pass, until [`invalidate`](Self::invalidate) or
/// [`force_refresh`](Self::force_refresh) is called.
#[derive(Default)]
pub struct SnapshotCache {
    slot: Mutex<Option<Arc<Snapshot>>>,
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached snapshot, probing with `collector` if there is none.
    ///
    /// Non-Apple hosts get `None` and nothing is cached.
    pub async fn get_or_probe(&self, collector: &Collector) -> Option<Arc<Snapshot>> {
        if !collector.config().platform.is_apple() {
            return None;
        }

        let mut slot = self.slot.lock().await;
        if let Some(snapshot) = slot.as_ref() {
            debug!("Returning cached snapshot from {}", snapshot.probed_at);
            return Some(Arc::clone(snapshot));
        }

        let snapshot = Arc::new(collector.collect().await?);
        *slot = Some(Arc::clone(&snapshot));
        Some(snapshot)
    }

    /// Probe again and replace whatever was cached.
    pub async fn force_refresh(&self, collector: &Collector) -> Option<Arc<Snapshot>> {
        let mut slot = self.slot.lock().await;
        let snapshot = collector.collect().await.map(Arc::new);
        *slot = snapshot.clone();
        snapshot
    }

    /// Drop the cached snapshot so the next call probes again.
    pub async fn invalidate(&self) {
        *self.slot.lock().await = None;
    }

    /// The cached snapshot, without probing.
    pub async fn cached(&self) -> Option<Arc<Snapshot>> {
        self.slot.lock().await.clone()
    }
}

/// The cache behind [`detect`].
pub fn process_cache() -> &'static SnapshotCache {
    &PROCESS_CACHE
}

/// Probe the local machine once per process.
///
/// The first call runs every probe with `options`; every later call returns
/// the same snapshot. Returns `None` on non-Apple hosts.
pub async fn detect(options: DetectOptions) -> Option<Arc<Snapshot>> {
    let collector = Collector::new(ProbeConfig::with_options(options));
    process_cache().get_or_probe(&collector).await
}
