//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use feed_core::{Post, PostPage};

use super::responses::{PostPageResponse, PostResponse};

impl From<&Post> for PostResponse {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id.clone(),
            name: post.name.to_string(),
            text: post.text.clone(),
            source: post.source.to_string(),
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            source: post.source.to_string(),
            id: post.id,
            name: post.name.into_inner(),
            text: post.text,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

impl From<PostPage> for PostPageResponse {
    fn from(page: PostPage) -> Self {
        Self {
            items: page.items.into_iter().map(PostResponse::from).collect(),
            next_cursor: page.next_cursor,
        }
    }
}
