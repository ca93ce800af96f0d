//! Handler for short link redirects.

use axum::{
    extract::{Path, RawQuery, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::domain::click_event::ClickEvent;
use crate::domain::click_worker::enqueue_click;
use crate::domain::rewriter::{parse_query_pairs, to_location};
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short path to its destination.
///
/// # Endpoint
///
/// `GET /go/{*path}`
///
/// # Request Flow
///
/// 1. Resolve the percent-decoded path (exact match first, then prefix)
/// 2. Rewrite the destination with the leftover suffix and, for forwarding
///    jump types, the incoming query pairs
/// 3. Percent-encode non-ASCII characters for the `Location` header
/// 4. Queue a click event for the background worker
/// 5. Return 302 Found with the `Location` header
///
/// Clicks are fire-and-forget: a full queue drops the event and the redirect
/// still succeeds.
///
/// # Errors
///
/// Returns 404 Not Found if no active link matches the path.
pub async fn redirect_handler(
    Path(path): Path<String>,
    RawQuery(query): RawQuery,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let resolved = state.link_service.resolve(&path).await?;

    let incoming = query.as_deref().map(parse_query_pairs).unwrap_or_default();
    let target = resolved.target(&incoming);

    let location = HeaderValue::from_str(&to_location(&target)).map_err(|_| {
        AppError::internal(
            "Destination cannot be used as a Location header",
            json!({ "slug": resolved.link.slug }),
        )
    })?;
    let response = (StatusCode::FOUND, [(header::LOCATION, location)]).into_response();

    enqueue_click(
        &state.click_sender,
        ClickEvent::new(resolved.link.id, resolved.link.slug),
    );

    Ok(response)
}

/// Fallback for every unmatched route, including `/go/` with an empty path.
pub async fn not_found_handler() -> AppError {
    AppError::not_found("Short link not found", json!({}))
}
