//! Event bus.
//!
//! Fans each published [`FeedEvent`] out to every live subscriber of its
//! [`EventKind`]. Every subscriber owns a bounded queue; publishing never
//! waits on a slow consumer.

use dashmap::DashMap;
use feed_common::FeedConfig;
use feed_core::{EventKind, FeedEvent};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_util::sync::CancellationToken;

use super::subscription::Subscription;

/// Event bus configuration
#[derive(Debug, Clone)]
pub struct BusConfig {
    /// Queue capacity of each subscriber
    pub subscriber_buffer: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            subscriber_buffer: 1024,
        }
    }
}

impl From<&FeedConfig> for BusConfig {
    fn from(config: &FeedConfig) -> Self {
        Self {
            subscriber_buffer: config.bus_subscriber_buffer,
        }
    }
}

/// Sending side of one subscription, owned by the bus
struct SubscriberSlot {
    id: u64,
    tx: mpsc::Sender<FeedEvent>,
    dropped: Arc<AtomicU64>,
    /// Slot is dead once this fires, polled or not
    cancel: Option<CancellationToken>,
}

impl SubscriberSlot {
    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
    }

    fn is_live(&self) -> bool {
        !self.tx.is_closed() && !self.is_cancelled()
    }
}

struct BusInner {
    config: BusConfig,
    subscribers: DashMap<EventKind, Vec<SubscriberSlot>>,
    next_id: AtomicU64,
}

/// Typed publish/subscribe hub
///
/// Cheap to clone; all clones share the same registry.
#[derive(Clone)]
pub struct EventBus {
    inner: Arc<BusInner>,
}

impl EventBus {
    /// Create a new bus
    #[must_use]
    pub fn new(config: BusConfig) -> Self {
        Self {
            inner: Arc::new(BusInner {
                config: BusConfig {
                    subscriber_buffer: config.subscriber_buffer.max(1),
                },
                subscribers: DashMap::new(),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Register a new listener for `kind`
    ///
    /// The subscription only sees events published after this call.
    pub fn subscribe(&self, kind: EventKind) -> Subscription {
        self.register(kind, None)
    }

    /// Like [`subscribe`](Self::subscribe), but the bus itself releases the
    /// slot once `cancel` fires, even if the subscription is never read again
    pub fn subscribe_until(&self, kind: EventKind, cancel: CancellationToken) -> Subscription {
        self.register(kind, Some(cancel))
    }

    fn register(&self, kind: EventKind, cancel: Option<CancellationToken>) -> Subscription {
        let (tx, rx) = mpsc::channel(self.inner.config.subscriber_buffer);
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let dropped = Arc::new(AtomicU64::new(0));

        self.inner
            .subscribers
            .entry(kind)
            .or_default()
            .push(SubscriberSlot {
                id,
                tx,
                dropped: dropped.clone(),
                cancel,
            });

        tracing::debug!(subscription_id = id, kind = %kind, "Subscribed to event bus");

        Subscription::new(id, kind, rx, dropped, self.clone())
    }

    /// Deliver `event` to every current subscriber of its kind
    ///
    /// Returns the number of subscribers the event was queued for. A full
    /// queue drops the event for that subscriber only.
    pub fn publish(&self, event: FeedEvent) -> usize {
        let kind = event.kind();
        let mut delivered = 0;
        let mut emptied = false;

        if let Some(mut slots) = self.inner.subscribers.get_mut(&kind) {
            slots.retain(|slot| {
                if slot.is_cancelled() {
                    tracing::debug!(subscription_id = slot.id, kind = %kind, "Pruned cancelled subscriber");
                    return false;
                }
                match slot.tx.try_send(event.clone()) {
                    Ok(()) => {
                        delivered += 1;
                        true
                    }
                    Err(TrySendError::Full(_)) => {
                        let dropped = slot.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                        tracing::warn!(
                            subscription_id = slot.id,
                            kind = %kind,
                            dropped,
                            "Subscriber queue full, dropping event"
                        );
                        true
                    }
                    Err(TrySendError::Closed(_)) => {
                        tracing::debug!(subscription_id = slot.id, kind = %kind, "Pruned closed subscriber");
                        false
                    }
                }
            });
            emptied = slots.is_empty();
        }

        if emptied {
            self.inner.subscribers.remove_if(&kind, |_, slots| slots.is_empty());
        }

        tracing::trace!(kind = %kind, delivered, "Published event");
        delivered
    }

    /// Number of live subscribers for `kind`
    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.inner
            .subscribers
            .get(&kind)
            .map_or(0, |slots| slots.iter().filter(|s| s.is_live()).count())
    }

    /// Remove the subscriber with `id`; unknown ids are ignored
    pub(crate) fn remove_subscriber(&self, kind: EventKind, id: u64) {
        let mut emptied = false;

        if let Some(mut slots) = self.inner.subscribers.get_mut(&kind) {
            slots.retain(|slot| slot.id != id);
            emptied = slots.is_empty();
        }

        if emptied {
            self.inner.subscribers.remove_if(&kind, |_, slots| slots.is_empty());
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(BusConfig::default())
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("config", &self.inner.config)
            .field("kinds", &self.inner.subscribers.len())
            .finish()
    }
}
