//! Business logic services
//!
//! Validation, persistence, and event publication for the post feed.

pub mod context;
pub mod error;
pub mod post;

pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use post::PostService;
