//! # feed-realtime
//!
//! In-process realtime layer for the post feed.
//!
//! ## Features
//!
//! - **Event Bus**: per-kind fan-out of [`FeedEvent`]s into bounded subscriber queues
//! - **Subscription Adapter**: bus subscriptions as cancellable `Stream`s
//! - **Presence**: "currently typing" tracking with periodic expiry sweeps
//!
//! ## Example
//!
//! ```ignore
//! use feed_core::EventKind;
//! use feed_realtime::{attach, EventBus, PresenceStore, PresenceSweeper, SweeperConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! let bus = EventBus::default();
//! let presence = PresenceStore::new();
//! let sweeper = PresenceSweeper::new(SweeperConfig::default(), presence.clone(), bus.clone()).start();
//!
//! let cancel = CancellationToken::new();
//! let mut posts = attach(&bus, EventKind::ContentAdded, cancel.clone(), |event| {
//!     Ok(event.as_post().cloned())
//! });
//!
//! // ... later, on shutdown
//! cancel.cancel();
//! sweeper.stop().await;
//! ```
//!
//! [`FeedEvent`]: feed_core::FeedEvent

pub mod error;
pub mod presence;
pub mod pubsub;

pub use error::TransformError;
pub use presence::{PresenceEntry, PresenceStore, PresenceSweeper, SweeperConfig, SweeperHandle};
pub use pubsub::{attach, BusConfig, EventBus, Subscribed, Subscription};
