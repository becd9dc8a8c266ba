//! Traits (ports) - interfaces implemented by the infrastructure layer

mod repositories;

pub use repositories::{
    PageQuery, PostPage, PostRepository, RepoResult, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
    MIN_PAGE_SIZE,
};
