//! In-memory implementation of PostRepository
//!
//! Used when no database is configured and throughout the test suites.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::instrument;

use feed_core::traits::{PageQuery, PostPage, PostRepository, RepoResult};
use feed_core::{DomainError, NewPost, Post};

use super::error::post_already_exists;

/// Process-local post store
///
/// Posts are kept in insertion order with strictly increasing `created_at`,
/// so cursors never straddle two posts.
#[derive(Debug, Clone, Default)]
pub struct MemoryPostRepository {
    posts: Arc<RwLock<Vec<Post>>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryPostRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following `create` fail with `StoreUnavailable`
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of stored posts
    pub fn len(&self) -> usize {
        self.posts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.read().is_empty()
    }

    /// Next creation timestamp, never earlier than or equal to the last one
    fn next_timestamp(last: Option<DateTime<Utc>>) -> DateTime<Utc> {
        let now = Utc::now();
        match last {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        }
    }
}

#[async_trait]
impl PostRepository for MemoryPostRepository {
    #[instrument(skip(self, post), fields(post_id = %post.id, author = %post.name))]
    async fn create(&self, post: &NewPost) -> RepoResult<Post> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DomainError::StoreUnavailable(
                "memory store rejecting writes".to_string(),
            ));
        }

        let mut posts = self.posts.write();
        if posts.iter().any(|p| p.id == post.id) {
            return Err(post_already_exists(&post.id));
        }

        let created_at = Self::next_timestamp(posts.last().map(|p| p.created_at));
        let stored = Post::from_new(post.clone(), created_at);
        posts.push(stored.clone());

        Ok(stored)
    }

    #[instrument(skip(self))]
    async fn list_page(&self, query: &PageQuery) -> RepoResult<PostPage> {
        let limit = usize::try_from(query.fetch_limit()).unwrap_or(usize::MAX);

        let rows: Vec<Post> = self
            .posts
            .read()
            .iter()
            .rev()
            .filter(|p| query.cursor.map_or(true, |cursor| p.created_at <= cursor))
            .take(limit)
            .cloned()
            .collect();

        Ok(PostPage::from_newest_first(rows, query.take))
    }
}
