//! Integration test utilities for the post feed server
//!
//! Spawns the real Axum application on an ephemeral port (in-memory store) and
//! drives it over HTTP and Server-Sent Events.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
