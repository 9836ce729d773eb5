//! Gateway-injected caller identity extractor.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use http::request::Parts;

use fitfusion_domain::id::OwnerId;

/// Header the gateway sets after verifying the caller's session.
pub const USER_ID_HEADER: &str = "x-fitfusion-user-id";

/// Caller identity injected by the gateway via `x-fitfusion-user-id`.
///
/// Never rejects: an absent, non-UTF-8 or blank header yields an
/// unauthenticated caller (`None`). Handlers decide what that means, so the
/// authentication gate stays ordered with the other permission checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity(pub Option<OwnerId>);

impl CallerIdentity {
    pub fn user_id(&self) -> Option<&OwnerId> {
        self.0.as_ref()
    }
}

impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    // axum-core 0.5 declares `fn -> impl Future + Send`; read the header
    // synchronously and return a 'static future.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<OwnerId>().ok());

        async move { Ok(Self(user_id)) }
    }
}
