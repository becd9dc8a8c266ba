//! Presence sweeper
//!
//! Periodically evicts stale presence entries and announces the change on the
//! event bus.

use feed_common::FeedConfig;
use feed_core::FeedEvent;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::store::PresenceStore;
use crate::pubsub::EventBus;

/// Configuration for the presence sweeper
#[derive(Debug, Clone)]
pub struct SweeperConfig {
    /// Time between two sweeps
    pub interval: Duration,
    /// Entries older than this are evicted
    pub expiry: Duration,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(3000),
            expiry: Duration::from_millis(3000),
        }
    }
}

impl From<&FeedConfig> for SweeperConfig {
    fn from(config: &FeedConfig) -> Self {
        Self {
            interval: config.presence_sweep_interval(),
            expiry: config.presence_expiry(),
        }
    }
}

/// Periodic task pruning a [`PresenceStore`]
#[derive(Debug, Clone)]
pub struct PresenceSweeper {
    config: SweeperConfig,
    store: PresenceStore,
    bus: EventBus,
}

impl PresenceSweeper {
    /// Create a new sweeper; nothing runs until [`start`](Self::start)
    pub fn new(config: SweeperConfig, store: PresenceStore, bus: EventBus) -> Self {
        Self { config, store, bus }
    }

    /// Run one sweep
    ///
    /// Publishes a single `PresenceChanged` when at least one entry was
    /// evicted. Returns the number of evicted entries.
    pub fn sweep_once(&self) -> usize {
        let removed = self.store.sweep_expired(self.config.expiry);
        if removed.is_empty() {
            return 0;
        }

        tracing::debug!(
            removed = removed.len(),
            identities = ?removed,
            "Evicted stale presence entries"
        );
        self.bus.publish(FeedEvent::PresenceChanged);
        removed.len()
    }

    /// Spawn the sweep loop
    ///
    /// The first sweep happens immediately, then once per interval.
    pub fn start(self) -> SweeperHandle {
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        tracing::info!(
            interval_ms = self.config.interval.as_millis() as u64,
            expiry_ms = self.config.expiry.as_millis() as u64,
            "Presence sweeper started"
        );

        let task = tokio::spawn(async move { self.run(token).await });

        SweeperHandle {
            cancel,
            task: Some(task),
        }
    }

    async fn run(self, cancel: CancellationToken) {
        // interval() rejects a zero period
        let period = self.config.interval.max(Duration::from_millis(1));
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    isolated_tick(|| self.sweep_once());
                }
            }
        }

        tracing::info!("Presence sweeper stopped");
    }
}

/// Run one tick, containing a panic so the loop survives to the next tick
fn isolated_tick<F: FnOnce() -> usize>(tick: F) -> Option<usize> {
    match panic::catch_unwind(AssertUnwindSafe(tick)) {
        Ok(removed) => Some(removed),
        Err(payload) => {
            let reason = payload
                .downcast_ref::<&str>()
                .map(ToString::to_string)
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            tracing::warn!(reason = %reason, "Presence sweep failed, retrying next tick");
            None
        }
    }
}

/// Owned handle to a running sweeper
///
/// Dropping the handle cancels the timer without waiting for the task.
#[derive(Debug)]
pub struct SweeperHandle {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl SweeperHandle {
    /// Cancel the timer and wait for the task to finish
    pub async fn stop(mut self) {
        self.cancel.cancel();

        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "Presence sweeper task ended abnormally");
            }
        }
    }

    /// Whether the sweep loop is still running
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
