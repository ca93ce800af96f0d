//! Per-client rate limiting using a token bucket.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor},
};

/// Token bucket parameters for the redirect route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitSettings {
    /// Sustained requests per second per client.
    pub per_second: u64,
    pub burst: u32,
    /// Key on `X-Forwarded-For` / `X-Real-IP` / `Forwarded` headers, falling
    /// back to the peer address.
    pub behind_proxy: bool,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            per_second: 10,
            burst: 100,
            behind_proxy: false,
        }
    }
}

/// Highest rate a nanosecond replenish period can express.
pub const MAX_PER_SECOND: u64 = 1_000_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("rate limit needs a rate in 1..={MAX_PER_SECOND} and a positive burst size")]
pub struct InvalidRateLimit;

pub type RateLimitLayer<K> = GovernorLayer<K, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Creates a rate limiter keyed by `key_extractor`.
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
///
/// # Errors
///
/// Returns [`InvalidRateLimit`] if the burst size is zero or the rate is zero
/// or above [`MAX_PER_SECOND`].
pub fn layer<K: KeyExtractor>(
    settings: RateLimitSettings,
    key_extractor: K,
) -> Result<RateLimitLayer<K>, InvalidRateLimit> {
    let period_ns = replenish_period_ns(settings.per_second).ok_or(InvalidRateLimit)?;

    let governor_conf = GovernorConfigBuilder::default()
        .per_nanosecond(period_ns)
        .burst_size(settings.burst)
        .key_extractor(key_extractor)
        .finish()
        .ok_or(InvalidRateLimit)?;

    Ok(GovernorLayer::new(Arc::new(governor_conf)))
}

/// Interval in which governor replenishes one request, or `None` when the
/// rate is out of range.
fn replenish_period_ns(per_second: u64) -> Option<u64> {
    if per_second == 0 || per_second > MAX_PER_SECOND {
        return None;
    }
    Some(1_000_000_000 / per_second)
}

/// Limiter keyed by the socket peer address.
pub fn peer_layer(
    settings: RateLimitSettings,
) -> Result<RateLimitLayer<PeerIpKeyExtractor>, InvalidRateLimit> {
    layer(settings, PeerIpKeyExtractor)
}

/// Limiter keyed by the client address reported by a reverse proxy.
pub fn proxy_layer(
    settings: RateLimitSettings,
) -> Result<RateLimitLayer<SmartIpKeyExtractor>, InvalidRateLimit> {
    layer(settings, SmartIpKeyExtractor)
}
