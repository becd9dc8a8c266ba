//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

/// New post request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddPostRequest {
    /// Caller-chosen id; a UUID is generated when absent
    #[validate(length(min = 1, max = 64, message = "Post id must be 1-64 characters"))]
    pub id: Option<String>,

    #[validate(length(min = 1, max = 4000, message = "Text must be 1-4000 characters"))]
    pub text: String,
}

impl AddPostRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: None,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Typing indicator update
#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct SetTypingRequest {
    pub typing: bool,
}

/// Post listing query
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ListPostsQuery {
    /// Inclusive upper bound on `created_at` (RFC 3339)
    pub cursor: Option<DateTime<Utc>>,

    #[validate(range(min = 1, max = 50, message = "take must be between 1 and 50"))]
    pub take: Option<i64>,
}
