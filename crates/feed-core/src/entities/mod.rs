//! Domain entities - core business objects

mod post;

pub use post::{NewPost, Post, PostSource};
