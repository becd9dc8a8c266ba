//! Repository traits (ports) - define the interface for post storage
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation (PostgreSQL or in-memory).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{NewPost, Post};
use crate::error::DomainError;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

/// Smallest accepted page size
pub const MIN_PAGE_SIZE: i64 = 1;
/// Largest accepted page size
pub const MAX_PAGE_SIZE: i64 = 50;
/// Page size used when the caller gives none
pub const DEFAULT_PAGE_SIZE: i64 = 10;

// ============================================================================
// Pagination
// ============================================================================

/// Pagination options for post listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery {
    /// Only posts created at or before this instant
    pub cursor: Option<DateTime<Utc>>,
    /// Page size, within `MIN_PAGE_SIZE..=MAX_PAGE_SIZE`
    pub take: i64,
}

impl PageQuery {
    /// Create a query, clamping `take` into the accepted range
    pub fn new(cursor: Option<DateTime<Utc>>, take: Option<i64>) -> Self {
        Self {
            cursor,
            take: take
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE),
        }
    }

    /// Number of rows a store should fetch to detect a following page
    #[inline]
    pub fn fetch_limit(&self) -> i64 {
        self.take + 1
    }
}

impl Default for PageQuery {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of posts in ascending creation order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPage {
    pub items: Vec<Post>,
    /// Cursor for the next (older) page; absent on the last page
    pub next_cursor: Option<DateTime<Utc>>,
}

impl PostPage {
    /// Shape up to `take + 1` rows fetched newest-first into a page.
    ///
    /// Rows are reversed into ascending order. When more than `take` rows are
    /// present, the oldest one is dropped and its `created_at` becomes the
    /// inclusive cursor of the following page.
    pub fn from_newest_first(mut rows: Vec<Post>, take: i64) -> Self {
        rows.reverse();

        let take = usize::try_from(take.max(0)).unwrap_or(usize::MAX);
        let next_cursor = if rows.len() > take {
            Some(rows.remove(0).created_at)
        } else {
            None
        };

        Self {
            items: rows,
            next_cursor,
        }
    }

    /// An empty, final page
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            next_cursor: None,
        }
    }
}

// ============================================================================
// Post Repository
// ============================================================================

#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Persist a new post and return its stored form
    async fn create(&self, post: &NewPost) -> RepoResult<Post>;

    /// List a page of posts, newest first, starting at the cursor
    async fn list_page(&self, query: &PageQuery) -> RepoResult<PostPage>;
}
