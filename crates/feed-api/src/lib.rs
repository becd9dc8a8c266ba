//! # feed-api
//!
//! HTTP surface of the post feed built with Axum: JSON endpoints for posting,
//! typing and listing, plus Server-Sent Event streams for new posts and the
//! set of people currently typing.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{create_app, create_app_state, run, run_server, start_sweeper};
pub use state::AppState;
