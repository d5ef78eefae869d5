//! CORS handling.
//!
//! Preflight responses are gated by the configured [`OriginPolicy`]: the
//! caller's origin is echoed only when the policy allows it (or `*` when no
//! origin was given under a wildcard policy). Actual REST/GraphQL responses
//! carry an unconditionally permissive header set, matching the deployed
//! behavior this gateway reproduces.
//!
//! [`OriginPolicy`]: chatgate_core::OriginPolicy

use axum::extract::State;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ACCESS_CONTROL_MAX_AGE, ORIGIN,
};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::debug;

use crate::state::AppState;

/// Methods advertised on preflight and attached to every response.
const ALLOW_METHODS: &str = "POST, OPTIONS";

/// Headers a preflighted request may carry.
const PREFLIGHT_ALLOW_HEADERS: &str = "Content-Type, Authorization";

/// Headers advertised on actual responses.
const RESPONSE_ALLOW_HEADERS: &str = "Content-Type";

/// Preflight cache lifetime: 24 hours.
const MAX_AGE_SECS: &str = "86400";

/// Attach the permissive header set every non-preflight response carries.
pub fn apply_permissive(headers: &mut HeaderMap) {
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(RESPONSE_ALLOW_HEADERS),
    );
}

/// Answer a CORS preflight request (`OPTIONS`, any path).
pub async fn preflight(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let origin = headers.get(ORIGIN).and_then(|v| v.to_str().ok());
    debug!(?origin, "CORS preflight");

    let mut response = StatusCode::NO_CONTENT.into_response();
    let headers = response.headers_mut();
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(PREFLIGHT_ALLOW_HEADERS),
    );
    headers.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static(MAX_AGE_SECS));

    // Allow-origin is omitted entirely when the policy rejects the origin
    if let Some(echo) = state.config.origin_policy.preflight_origin(origin)
        && let Ok(value) = HeaderValue::from_str(&echo)
    {
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, value);
    }

    response
}
