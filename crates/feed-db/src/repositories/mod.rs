//! Repository implementations
//!
//! Implementations of the post repository trait defined in feed-core.

mod error;
mod memory;
mod post;

pub use memory::MemoryPostRepository;
pub use post::PgPostRepository;
