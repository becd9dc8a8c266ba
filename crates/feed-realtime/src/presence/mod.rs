//! Presence tracking module.
//!
//! Tracks who is typing and expires stale entries on a timer.

mod store;
mod sweeper;

pub use store::{PresenceEntry, PresenceStore};
pub use sweeper::{PresenceSweeper, SweeperConfig, SweeperHandle};
