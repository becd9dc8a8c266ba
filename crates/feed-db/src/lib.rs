//! # feed-db
//!
//! Storage layer implementing [`PostRepository`](feed_core::PostRepository).
//!
//! ## Overview
//!
//! - Connection pool management and schema setup for PostgreSQL via SQLx
//! - Database models with SQLx `FromRow` derives and model -> entity mappers
//! - `PgPostRepository` for PostgreSQL
//! - `MemoryPostRepository` for running without a database and for tests
//!
//! ## Usage
//!
//! ```rust,ignore
//! use feed_db::{create_pool, run_migrations, DatabaseConfig, PgPostRepository};
//!
//! async fn example(config: &feed_common::DatabaseConfig) -> Result<(), sqlx::Error> {
//!     let pool = create_pool(&DatabaseConfig::from(config)).await?;
//!     run_migrations(&pool).await?;
//!     let posts = PgPostRepository::new(pool);
//!
//!     // Use the repository...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{MemoryPostRepository, PgPostRepository};
