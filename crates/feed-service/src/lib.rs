//! # feed-service
//!
//! Application layer containing the post feed use cases and DTOs.

pub mod dto;
pub mod services;

pub use dto::{AddPostRequest, ListPostsQuery, PostPageResponse, PostResponse, SetTypingRequest};
pub use services::{PostService, ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult};
