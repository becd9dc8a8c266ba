//! PostgreSQL implementation of PostRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use feed_core::traits::{PageQuery, PostPage, PostRepository, RepoResult};
use feed_core::{NewPost, Post};

use crate::models::PostModel;

use super::error::{map_db_error, map_unique_violation, post_already_exists};

/// PostgreSQL implementation of PostRepository
#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    /// Create a new PgPostRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    #[instrument(skip(self, post), fields(post_id = %post.id, author = %post.name))]
    async fn create(&self, post: &NewPost) -> RepoResult<Post> {
        let model = sqlx::query_as::<_, PostModel>(
            r#"
            INSERT INTO posts (id, name, text, source, created_at, updated_at)
            VALUES ($1, $2, $3, $4, now(), now())
            RETURNING id, name, text, source, created_at, updated_at
            "#,
        )
        .bind(&post.id)
        .bind(post.name.as_str())
        .bind(&post.text)
        .bind(post.source.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || post_already_exists(&post.id)))?;

        Post::try_from(model)
    }

    #[instrument(skip(self))]
    async fn list_page(&self, query: &PageQuery) -> RepoResult<PostPage> {
        let rows = match query.cursor {
            Some(cursor) => {
                sqlx::query_as::<_, PostModel>(
                    r#"
                    SELECT id, name, text, source, created_at, updated_at
                    FROM posts
                    WHERE created_at <= $1
                    ORDER BY created_at DESC, id DESC
                    LIMIT $2
                    "#,
                )
                .bind(cursor)
                .bind(query.fetch_limit())
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, PostModel>(
                    r#"
                    SELECT id, name, text, source, created_at, updated_at
                    FROM posts
                    ORDER BY created_at DESC, id DESC
                    LIMIT $1
                    "#,
                )
                .bind(query.fetch_limit())
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(map_db_error)?;

        let posts = rows
            .into_iter()
            .map(Post::try_from)
            .collect::<RepoResult<Vec<_>>>()?;

        Ok(PostPage::from_newest_first(posts, query.take))
    }
}
