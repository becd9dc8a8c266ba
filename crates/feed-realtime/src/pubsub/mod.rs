//! In-process Pub/Sub module.
//!
//! Provides the event bus and the stream adapter consumers attach through.

mod adapter;
mod bus;
mod subscription;

pub use adapter::{attach, Subscribed};
pub use bus::{BusConfig, EventBus};
pub use subscription::Subscription;
