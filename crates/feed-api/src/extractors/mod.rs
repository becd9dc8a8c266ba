//! Axum extractors for request handling
//!
//! Custom extractors for the acting identity and validated input.

mod identity;
mod validated;

pub use identity::{ActingIdentity, IDENTITY_HEADER};
pub use validated::{ValidatedJson, ValidatedQuery};
