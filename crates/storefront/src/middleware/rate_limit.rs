//! Rate limiting middleware using governor and `tower_governor`.
//!
//! Only the write endpoints are limited:
//! - `order_rate_limiter`: order submission (~6/min)
//! - `review_rate_limiter`: review posting (~3/min)

use std::net::IpAddr;
use std::sync::Arc;

use axum::http::Request;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

use super::client_ip::client_ip;

/// Keys requests by client address: proxy headers first, then the socket peer.
#[derive(Clone, Copy)]
pub struct ClientIpKeyExtractor;

impl tower_governor::key_extractor::KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        client_ip(req.headers(), req.extensions()).ok_or(GovernorError::UnableToExtractKey)
    }
}

/// Rate limiter layer type for Axum.
pub type RateLimiterLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Create rate limiter for order submission: ~6 requests per minute per IP.
///
/// Configuration: 1 request every 10 seconds (replenish), burst of 3.
///
/// # Panics
///
/// This function will not panic. `per_second(10)` and `burst_size(3)` are
/// valid positive integers, which `GovernorConfigBuilder` always accepts.
#[must_use]
pub fn order_rate_limiter() -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor)
        .per_second(10)
        .burst_size(3)
        .finish()
        .expect("rate limiter config with per_second(10) and burst_size(3) is valid");
    GovernorLayer::new(Arc::new(config))
}

/// Create rate limiter for review posting: ~3 requests per minute per IP.
///
/// Configuration: 1 request every 20 seconds (replenish), burst of 2.
///
/// # Panics
///
/// This function will not panic. `per_second(20)` and `burst_size(2)` are
/// valid positive integers, which `GovernorConfigBuilder` always accepts.
#[must_use]
pub fn review_rate_limiter() -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor)
        .per_second(20)
        .burst_size(2)
        .finish()
        .expect("rate limiter config with per_second(20) and burst_size(2) is valid");
    GovernorLayer::new(Arc::new(config))
}
