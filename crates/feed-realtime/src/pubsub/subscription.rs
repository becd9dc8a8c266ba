//! Subscription handle returned by [`EventBus::subscribe`].

use feed_core::{EventKind, FeedEvent};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

use super::bus::EventBus;

/// Live handle bound to one event kind and one consumer
///
/// Dropping the handle unsubscribes it.
pub struct Subscription {
    id: u64,
    kind: EventKind,
    rx: mpsc::Receiver<FeedEvent>,
    dropped: Arc<AtomicU64>,
    /// `None` once unsubscribed
    bus: Option<EventBus>,
}

impl Subscription {
    pub(crate) fn new(
        id: u64,
        kind: EventKind,
        rx: mpsc::Receiver<FeedEvent>,
        dropped: Arc<AtomicU64>,
        bus: EventBus,
    ) -> Self {
        Self {
            id,
            kind,
            rx,
            dropped,
            bus: Some(bus),
        }
    }

    /// Wait for the next event
    ///
    /// Returns `None` once the subscription has been unsubscribed.
    pub async fn recv(&mut self) -> Option<FeedEvent> {
        if self.bus.is_none() {
            return None;
        }
        self.rx.recv().await
    }

    /// Take the next queued event without waiting
    pub fn try_recv(&mut self) -> Option<FeedEvent> {
        if self.bus.is_none() {
            return None;
        }
        self.rx.try_recv().ok()
    }

    /// Stop delivery and release the bus slot; safe to call repeatedly
    pub fn unsubscribe(&mut self) {
        if let Some(bus) = self.bus.take() {
            bus.remove_subscriber(self.kind, self.id);
            self.rx.close();
            tracing::debug!(subscription_id = self.id, kind = %self.kind, "Unsubscribed from event bus");
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn is_active(&self) -> bool {
        self.bus.is_some()
    }

    /// Events dropped because this subscriber's queue was full
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("active", &self.is_active())
            .finish()
    }
}
