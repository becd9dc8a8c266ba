//! Feed events published on the in-process event bus

mod feed_event;

pub use feed_event::{EventKind, FeedEvent};
