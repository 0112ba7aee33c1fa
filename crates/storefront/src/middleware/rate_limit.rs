//! Per-client rate limiting for the `/api` route groups.
//!
//! - [`auth_rate_limiter`]: `/api/auth`, about 10 requests a minute
//! - [`api_rate_limiter`]: vendor directory and cart validation, about 100 a minute
//!
//! Every limiter error is answered with the JSON envelope, so throttled and
//! unidentifiable clients see the same response shape as everything else.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::{
    extract::ConnectInfo,
    http::{HeaderMap, Request},
    response::{IntoResponse, Response},
};
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{
    GovernorError, GovernorLayer, governor::GovernorConfigBuilder, key_extractor::KeyExtractor,
};

use crate::error::AppError;

// =============================================================================
// Client Identity
// =============================================================================

/// Headers carrying the original client address, in order of trust.
///
/// The edge (Cloudflare) sets `cf-connecting-ip`; the hosting proxy sets the
/// rest.
const CLIENT_IP_HEADERS: [&str; 4] = [
    "cf-connecting-ip",
    "x-forwarded-for",
    "x-real-ip",
    "fly-client-ip",
];

/// Keys requests by client IP.
///
/// Proxy headers win; a direct connection falls back to the socket peer,
/// which requires serving with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
#[derive(Debug, Clone, Copy)]
pub struct ClientIpKeyExtractor;

impl KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        CLIENT_IP_HEADERS
            .iter()
            .find_map(|name| header_ip(req.headers(), name))
            .or_else(|| {
                req.extensions()
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|ConnectInfo(peer)| peer.ip())
            })
            .ok_or(GovernorError::UnableToExtractKey)
    }
}

/// First address in a (possibly comma-separated) client IP header.
fn header_ip(headers: &HeaderMap, name: &str) -> Option<IpAddr> {
    let value = headers.get(name)?.to_str().ok()?;
    value.split(',').next()?.trim().parse().ok()
}

// =============================================================================
// Limiters
// =============================================================================

/// Rate limiter layer type for Axum.
pub type RateLimiterLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// `/api/auth`: one request replenished every 6 seconds, burst of 5.
#[must_use]
pub fn auth_rate_limiter() -> RateLimiterLayer {
    limiter(6, 5)
}

/// Vendor directory and cart validation: one request a second, burst of 50.
#[must_use]
pub fn api_rate_limiter() -> RateLimiterLayer {
    limiter(1, 50)
}

/// # Panics
///
/// Panics if `replenish_secs` or `burst` is zero. Both callers pass
/// positive constants.
fn limiter(replenish_secs: u64, burst: u32) -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor)
        .per_second(replenish_secs)
        .burst_size(burst)
        .finish()
        .expect("rate limiter replenish period and burst are positive");

    GovernorLayer::new(Arc::new(config)).error_handler(limit_error_response)
}

/// Answer a limiter error with the JSON envelope.
///
/// A throttled client gets `429` plus the limiter's `retry-after` and
/// `x-ratelimit-after` headers. A request with no client address is a
/// deployment fault and gets the generic `500`.
fn limit_error_response(error: GovernorError) -> Response {
    match error {
        GovernorError::TooManyRequests { wait_time, headers } => {
            tracing::debug!(wait_time, "Rate limit exceeded");
            let mut response = AppError::RateLimited.into_response();
            if let Some(headers) = headers {
                response.headers_mut().extend(headers);
            }
            response
        }
        error @ (GovernorError::UnableToExtractKey | GovernorError::Other { .. }) => {
            AppError::internal("Internal server error", error).into_response()
        }
    }
}
