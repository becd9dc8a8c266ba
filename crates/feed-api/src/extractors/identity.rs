//! Acting identity extractor
//!
//! Reads the caller's display name from the `x-feed-identity` header. There is
//! no authentication; the header is trusted as-is.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use feed_common::AppError;
use feed_core::Identity;

use crate::response::ApiError;

/// Header carrying the acting identity
pub const IDENTITY_HEADER: &str = "x-feed-identity";

/// Identity of the caller performing a mutation
#[derive(Debug, Clone)]
pub struct ActingIdentity(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for ActingIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let name = parts
            .headers
            .get(IDENTITY_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or(ApiError::App(AppError::MissingIdentity))?;

        Ok(ActingIdentity(Identity::from(name)))
    }
}
