//! Post service
//!
//! Handles post intake, typing state, listing, and the live subscriptions
//! ("on new content" and "who is typing").

use feed_core::traits::PageQuery;
use feed_core::{EventKind, FeedEvent, Identity, NewPost};
use feed_realtime::{attach, Subscribed, TransformError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::dto::{AddPostRequest, ListPostsQuery, PostPageResponse, PostResponse, SetTypingRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Post service
pub struct PostService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PostService<'a> {
    /// Create a new PostService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Store a new post by `identity`
    ///
    /// On success `ContentAdded` is published, the author stops typing and
    /// `PresenceChanged` is published. A failed write publishes nothing.
    #[instrument(skip(self, request), fields(author = %identity))]
    pub async fn add_post(
        &self,
        identity: &Identity,
        request: AddPostRequest,
    ) -> ServiceResult<PostResponse> {
        require_identity(identity)?;
        request.validate()?;
        if request.text.trim().is_empty() {
            return Err(ServiceError::validation("text: Text must not be blank"));
        }

        let id = request.id.unwrap_or_else(|| Uuid::new_v4().to_string());
        let draft = NewPost::new(id, identity.clone(), request.text);

        let post = match self.ctx.post_repo().create(&draft).await {
            Ok(post) => post,
            Err(e) => {
                warn!(post_id = %draft.id, error = %e, "Failed to store post");
                return Err(e.into());
            }
        };

        info!(post_id = %post.id, preview = %post.preview(40), "Post created");

        let response = PostResponse::from(&post);
        self.ctx.bus().publish(FeedEvent::ContentAdded(post));
        self.ctx.presence().remove(identity);
        self.ctx.bus().publish(FeedEvent::PresenceChanged);

        Ok(response)
    }

    /// Mark `identity` as typing or not typing
    ///
    /// Always publishes `PresenceChanged`, even when nothing changed.
    #[instrument(skip(self))]
    pub fn set_typing(&self, identity: &Identity, request: SetTypingRequest) -> ServiceResult<()> {
        require_identity(identity)?;

        if request.typing {
            self.ctx.presence().touch(identity);
        } else {
            self.ctx.presence().remove(identity);
        }
        debug!(typing = request.typing, "Typing state updated");

        self.ctx.bus().publish(FeedEvent::PresenceChanged);
        Ok(())
    }

    /// List a page of posts
    #[instrument(skip(self))]
    pub async fn list_posts(&self, query: ListPostsQuery) -> ServiceResult<PostPageResponse> {
        query.validate()?;

        let page = self
            .ctx
            .post_repo()
            .list_page(&PageQuery::new(query.cursor, query.take))
            .await?;

        Ok(PostPageResponse::from(page))
    }

    /// Stream every post stored from now on, until `cancel` fires
    pub fn on_add(&self, cancel: CancellationToken) -> Subscribed<PostResponse> {
        attach(self.ctx.bus(), EventKind::ContentAdded, cancel, |event| match event {
            FeedEvent::ContentAdded(post) => Ok(Some(PostResponse::from(post))),
            other => Err(TransformError::UnexpectedEvent(other.kind())),
        })
    }

    /// Stream the sorted set of typing identities on every presence change
    pub fn who_is_typing(&self, cancel: CancellationToken) -> Subscribed<Vec<Identity>> {
        let presence = self.ctx.presence().clone();

        attach(self.ctx.bus(), EventKind::PresenceChanged, cancel, move |event| match event {
            FeedEvent::PresenceChanged => Ok(Some(presence.snapshot_keys())),
            other => Err(TransformError::UnexpectedEvent(other.kind())),
        })
    }
}

fn require_identity(identity: &Identity) -> ServiceResult<()> {
    if identity.is_blank() {
        return Err(ServiceError::validation("identity must not be blank"));
    }
    Ok(())
}
