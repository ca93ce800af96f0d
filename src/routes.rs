//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET /go/{*path}` - Short link redirect (rate limited per client IP)
//! - `GET /health`     - Health check: database, click queue
//!
//! Every other path answers 404 with a JSON error body. Paths are matched as
//! received: trailing slashes are significant for prefix slugs.

use crate::api::handlers::{health_handler, not_found_handler, redirect_handler};
use crate::api::middleware::rate_limit::{self, InvalidRateLimit, RateLimitSettings};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;

/// Builds the application router.
///
/// The server must be started with `into_make_service_with_connect_info`
/// so the rate limiter can see peer addresses.
///
/// # Errors
///
/// Returns [`InvalidRateLimit`] if `rate_limit` has a zero rate or burst.
pub fn app_router(
    state: AppState,
    rate_limit: RateLimitSettings,
) -> Result<Router, InvalidRateLimit> {
    let redirect_routes = Router::new().route("/go/{*path}", get(redirect_handler));

    let redirect_routes = if rate_limit.behind_proxy {
        redirect_routes.layer(rate_limit::proxy_layer(rate_limit)?)
    } else {
        redirect_routes.layer(rate_limit::peer_layer(rate_limit)?)
    };

    Ok(Router::new()
        .merge(redirect_routes)
        .route("/health", get(health_handler))
        .fallback(not_found_handler)
        .with_state(state)
        .layer(tracing::layer()))
}
