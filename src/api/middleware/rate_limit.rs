//! Per-client rate limiting using the token bucket algorithm.

use axum::Router;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor},
};

/// Token bucket parameters.
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    pub per_second: u64,
    pub burst_size: u32,
}

/// Public lookups and calculations: 2 requests per second, bursts of 100.
pub const PUBLIC: Limits = Limits {
    per_second: 2,
    burst_size: 100,
};

/// Writes and admin routes: 1 request per second, bursts of 10.
pub const SECURE: Limits = Limits {
    per_second: 1,
    burst_size: 10,
};

/// Wraps `router` in a rate limiter keyed by client IP.
///
/// With `behind_proxy` the client IP is read from `X-Forwarded-For`,
/// `X-Real-IP` or `Forwarded`, falling back to the peer address. Enable it only
/// behind a trusted reverse proxy, since clients can set these headers.
///
/// Requests over the limit receive `429 Too Many Requests`. The peer address
/// requires serving with `into_make_service_with_connect_info`.
pub fn apply<S>(router: Router<S>, limits: Limits, behind_proxy: bool) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    if behind_proxy {
        router.layer(governor_layer(SmartIpKeyExtractor, limits))
    } else {
        router.layer(governor_layer(PeerIpKeyExtractor, limits))
    }
}

fn governor_layer<K>(
    key_extractor: K,
    limits: Limits,
) -> GovernorLayer<K, NoOpMiddleware<QuantaInstant>, axum::body::Body>
where
    K: KeyExtractor,
{
    let config = GovernorConfigBuilder::default()
        .per_second(limits.per_second)
        .burst_size(limits.burst_size)
        .key_extractor(key_extractor)
        .finish()
        .expect("rate limits are non-zero");

    GovernorLayer::new(Arc::new(config))
}
