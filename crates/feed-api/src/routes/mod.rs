//! Route definitions

use axum::{routing::get, routing::post, Router};

use crate::handlers::{health, posts, streams};
use crate::state::AppState;

/// Create the main router with all routes
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api_routes())
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", post(posts::add_post).get(posts::list_posts))
        .route("/posts/typing", post(posts::set_typing))
        .route("/posts/stream", get(streams::post_stream))
        .route("/typing/stream", get(streams::typing_stream))
}
