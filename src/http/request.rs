//! Inbound request identity: correlation IDs and the resolved user claim.
//!
//! # Responsibilities
//! - Ensure every request carries an `x-request-id` as early as possible
//! - Surface the upstream-resolved identity claim to handlers
//!
//! # Design Decisions
//! - Request ID is a UUID v4; an ID supplied by the caller is kept
//! - The identity claim is opaque here; resolving it is an upstream concern

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{HeaderValue, Request};
use std::convert::Infallible;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use uuid::Uuid;

/// Header carrying the correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Header carrying the pre-resolved identity claim.
pub const X_USER_ID: &str = "x-user-id";

/// Layer that stamps a request ID onto requests missing one.
#[derive(Debug, Clone, Default)]
pub struct RequestIdLayer;

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdService { inner }
    }
}

/// Service produced by [`RequestIdLayer`].
#[derive(Debug, Clone)]
pub struct RequestIdService<S> {
    inner: S,
}

impl<S, B> Service<Request<B>> for RequestIdService<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<B>) -> Self::Future {
        if !request.headers().contains_key(X_REQUEST_ID) {
            let id = Uuid::new_v4().to_string();
            if let Ok(value) = HeaderValue::from_str(&id) {
                request.headers_mut().insert(X_REQUEST_ID, value);
            }
        }
        self.inner.call(request)
    }
}

/// Identity claim attached by an upstream collaborator.
///
/// `None` when the header is absent; whether that is acceptable is the
/// backend's decision, not the gateway's.
#[derive(Debug, Clone)]
pub struct UserClaim(pub Option<String>);

impl<S> FromRequestParts<S> for UserClaim
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claim = parts
            .headers
            .get(X_USER_ID)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        Ok(Self(claim))
    }
}
