//! Post handlers
//!
//! Endpoints for posting, typing state and listing.

use axum::{extract::State, Json};
use feed_service::{
    AddPostRequest, ListPostsQuery, PostPageResponse, PostResponse, PostService, SetTypingRequest,
};

use crate::extractors::{ActingIdentity, ValidatedJson, ValidatedQuery};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// Add a post as the acting identity
///
/// POST /api/posts
pub async fn add_post(
    State(state): State<AppState>,
    ActingIdentity(identity): ActingIdentity,
    ValidatedJson(request): ValidatedJson<AddPostRequest>,
) -> ApiResult<Created<Json<PostResponse>>> {
    let service = PostService::new(state.service_context());
    let response = service.add_post(&identity, request).await?;
    Ok(Created(Json(response)))
}

/// Report whether the acting identity is typing
///
/// POST /api/posts/typing
pub async fn set_typing(
    State(state): State<AppState>,
    ActingIdentity(identity): ActingIdentity,
    ValidatedJson(request): ValidatedJson<SetTypingRequest>,
) -> ApiResult<NoContent> {
    PostService::new(state.service_context()).set_typing(&identity, request)?;
    Ok(NoContent)
}

/// List a page of posts
///
/// GET /api/posts?cursor=&take=
pub async fn list_posts(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ListPostsQuery>,
) -> ApiResult<Json<PostPageResponse>> {
    let service = PostService::new(state.service_context());
    let page = service.list_posts(query).await?;
    Ok(Json(page))
}
