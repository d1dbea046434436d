//! Request extractors.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use transitionflow_db::entities::account;

/// Authenticated account extractor.
#[derive(Debug, Clone)]
pub struct AuthAccount(pub account::Model);

impl<S> FromRequestParts<S> for AuthAccount
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get account from request extensions (set by auth middleware)
        parts
            .extensions
            .get::<account::Model>()
            .cloned()
            .map(AuthAccount)
            .ok_or((StatusCode::UNAUTHORIZED, "Unauthorized"))
    }
}

/// Optional authenticated account extractor.
#[derive(Debug, Clone)]
pub struct MaybeAuthAccount(pub Option<account::Model>);

impl<S> FromRequestParts<S> for MaybeAuthAccount
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<account::Model>().cloned()))
    }
}
