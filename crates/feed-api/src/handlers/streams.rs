//! Live stream handlers
//!
//! Server-Sent Event endpoints backed by bus subscriptions. A stream ends when
//! the client disconnects or the server shuts down.

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use feed_core::Identity;
use feed_service::PostService;
use futures::{Stream, StreamExt};

use crate::state::AppState;

/// SSE event name for new posts
pub const POST_EVENT: &str = "post";
/// SSE event name for typing snapshots
pub const TYPING_EVENT: &str = "typing";

/// Stream every new post
///
/// GET /api/posts/stream
pub async fn post_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let posts = PostService::new(state.service_context()).on_add(state.stream_token());
    tracing::debug!("Post stream opened");

    let events = posts.map(|post| Event::default().event(POST_EVENT).json_data(post));
    Sse::new(events).keep_alive(KeepAlive::default())
}

/// Stream the sorted names of everyone typing, on every change
///
/// GET /api/typing/stream
pub async fn typing_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let typing = PostService::new(state.service_context()).who_is_typing(state.stream_token());
    tracing::debug!("Typing stream opened");

    let events = typing.map(|names| {
        let names: Vec<String> = names.into_iter().map(Identity::into_inner).collect();
        Event::default().event(TYPING_EVENT).json_data(names)
    });
    Sse::new(events).keep_alive(KeepAlive::default())
}
