//! Feed events - emitted when feed state changes
//!
//! These events drive the live subscriptions:
//! - `ContentAdded` carries the stored post to "on new content" readers
//! - `PresenceChanged` tells "who is typing" readers to re-read presence

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entities::Post;

/// Discriminant of a [`FeedEvent`], used to route subscriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    ContentAdded,
    PresenceChanged,
}

impl EventKind {
    /// Every kind, in a stable order
    pub const ALL: [EventKind; 2] = [EventKind::ContentAdded, EventKind::PresenceChanged];

    /// Get the event type name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ContentAdded => "CONTENT_ADDED",
            Self::PresenceChanged => "PRESENCE_CHANGED",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// All events that flow through the feed's event bus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeedEvent {
    /// A post was stored
    ContentAdded(Post),
    /// Presence membership may have changed; consumers re-read the store
    PresenceChanged,
}

impl FeedEvent {
    /// Get the kind of this event
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::ContentAdded(_) => EventKind::ContentAdded,
            Self::PresenceChanged => EventKind::PresenceChanged,
        }
    }

    /// Borrow the post carried by a `ContentAdded` event
    #[must_use]
    pub fn as_post(&self) -> Option<&Post> {
        match self {
            Self::ContentAdded(post) => Some(post),
            Self::PresenceChanged => None,
        }
    }
}
