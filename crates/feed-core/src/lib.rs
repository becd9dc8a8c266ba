//! # feed-core
//!
//! Domain layer containing the post entity, identities, feed events, and the
//! store trait the rest of the workspace persists through.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{NewPost, Post, PostSource};
pub use error::DomainError;
pub use events::{EventKind, FeedEvent};
pub use traits::{
    PageQuery, PostPage, PostRepository, RepoResult, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
    MIN_PAGE_SIZE,
};
pub use value_objects::Identity;
