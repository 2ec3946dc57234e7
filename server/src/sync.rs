//! Fetch-and-merge cycle against the remote collection.
//!
//! A cycle fetches the whole remote collection without holding the store
//! lock, then takes the lock only for merge-and-persist. Cycles never
//! overlap: a trigger arriving while one runs is answered with
//! [`SyncOutcome::Skipped`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use quotebook_engine::{ConflictResolver, Timestamp};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::remote::RemoteClient;
use crate::websocket::ConnectionManager;
use crate::{now_millis, SharedStore};

/// Result of one sync cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum SyncOutcome {
    /// Remote quotes were merged into the store
    #[serde(rename_all = "camelCase")]
    Merged {
        fetched: usize,
        added: usize,
        replaced: usize,
        kept_local: usize,
    },
    /// The remote returned no quotes; nothing to merge
    Empty,
    /// Fetch or persist failed; the store was left as it was
    Failed { error: String },
    /// Another cycle was already running
    Skipped,
}

/// Snapshot of sync state for status queries.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    pub in_progress: bool,
    pub last_sync: Option<Timestamp>,
}

/// Runs sync cycles against the shared store.
pub struct SyncService {
    store: SharedStore,
    remote: Arc<RemoteClient>,
    resolver: Arc<dyn ConflictResolver + Send + Sync>,
    notifier: Arc<ConnectionManager>,
    /// Held for the duration of a cycle
    in_flight: Mutex<()>,
    /// Mirrors `in_flight` for status queries
    running: AtomicBool,
}

impl SyncService {
    pub fn new(
        store: SharedStore,
        remote: Arc<RemoteClient>,
        resolver: Arc<dyn ConflictResolver + Send + Sync>,
        notifier: Arc<ConnectionManager>,
    ) -> Self {
        Self {
            store,
            remote,
            resolver,
            notifier,
            in_flight: Mutex::new(()),
            running: AtomicBool::new(false),
        }
    }

    /// Run one fetch-and-merge cycle.
    pub async fn sync(&self) -> SyncOutcome {
        let Ok(_cycle) = self.in_flight.try_lock() else {
            tracing::debug!("Sync already in progress, skipping");
            return SyncOutcome::Skipped;
        };

        self.running.store(true, Ordering::SeqCst);
        let outcome = self.run_cycle().await;
        self.running.store(false, Ordering::SeqCst);

        outcome
    }

    async fn run_cycle(&self) -> SyncOutcome {
        self.notifier.info("Syncing with server...");

        let fetched_at = now_millis();
        let remote = match self.remote.fetch_quotes(fetched_at).await {
            Ok(quotes) => quotes,
            Err(e) => {
                tracing::warn!(
                    url = %self.remote.base_url(),
                    "Error fetching quotes from server: {}",
                    e
                );
                self.notifier.error("Failed to fetch quotes from server");
                return SyncOutcome::Failed {
                    error: e.to_string(),
                };
            }
        };

        if remote.is_empty() {
            tracing::debug!("Remote returned no quotes");
            return SyncOutcome::Empty;
        }

        let fetched = remote.len();
        let mut store = self.store.lock().await;

        let result = match store.merge(remote, self.resolver.as_ref()) {
            Ok(result) => result,
            Err(e) => {
                tracing::error!("Sync failed: {}", e);
                self.notifier.error("Sync failed. Please try again later.");
                return SyncOutcome::Failed {
                    error: e.to_string(),
                };
            }
        };

        if let Err(e) = store.record_sync(fetched_at) {
            tracing::warn!("Failed to record sync time: {}", e);
        }
        drop(store);

        tracing::info!(
            fetched,
            added = result.added.len(),
            replaced = result.replaced.len(),
            kept_local = result.kept_local.len(),
            "Sync completed"
        );
        self.notifier.success("Quotes updated with server data");

        SyncOutcome::Merged {
            fetched,
            added: result.added.len(),
            replaced: result.replaced.len(),
            kept_local: result.kept_local.len(),
        }
    }

    /// Current sync state.
    pub async fn status(&self) -> SyncStatus {
        let in_progress = self.running.load(Ordering::SeqCst);
        let last_sync = match self.store.lock().await.last_sync() {
            Ok(last_sync) => last_sync,
            Err(e) => {
                tracing::warn!("Failed to read last sync time: {}", e);
                None
            }
        };

        SyncStatus {
            in_progress,
            last_sync,
        }
    }
}
