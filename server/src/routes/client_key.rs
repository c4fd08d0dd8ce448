//! Client identity for quota accounting.
//!
//! The proxy sits behind a load balancer, so the peer address is the
//! balancer's. The first `x-forwarded-for` hop is the originating client;
//! `x-real-ip` is the fallback, then the shared key `unknown`.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::request::Parts;

pub const UNKNOWN_CLIENT: &str = "unknown";

/// Quota key of the requesting client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientKey(pub String);

impl<S> FromRequestParts<S> for ClientKey
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(client_key_from_headers(&parts.headers)))
    }
}

/// Derive the client key from forwarding headers.
#[must_use]
pub fn client_key_from_headers(headers: &HeaderMap) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());
    let real_ip = || {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };
    forwarded
        .or_else(real_ip)
        .unwrap_or(UNKNOWN_CLIENT)
        .to_string()
}

#[cfg(test)]
#[path = "client_key_test.rs"]
mod tests;
