//! Timer-driven sync.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::sync::{SyncOutcome, SyncService};

/// Spawn a task that syncs immediately and then every `period`.
///
/// Ticks missed while a slow cycle runs are dropped rather than replayed.
/// The task ends once `shutdown` carries `true` or its sender is dropped.
pub fn spawn_poller(
    service: Arc<SyncService>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!(period_secs = period.as_secs_f64(), "Sync poller started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match service.sync().await {
                        SyncOutcome::Failed { error } => {
                            tracing::debug!(%error, "Scheduled sync failed, retrying next tick");
                        }
                        outcome => tracing::debug!(?outcome, "Scheduled sync finished"),
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::info!("Sync poller stopping");
    })
}
