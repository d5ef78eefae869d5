//! Route definitions and router construction.
//!
//! Dispatch is exact path and method: the legacy REST path takes `POST`, the
//! GraphQL path takes all GraphQL traffic, `OPTIONS` anywhere is answered by
//! the preflight handler, and everything else is a bodyless 404. A matched
//! path with an unmatched non-OPTIONS method gets axum's built-in 405.

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;

use crate::state::AppState;
use crate::{cors, graphql, rest};

/// Legacy REST chat path.
pub const REST_PATH: &str = "/api/chat";

/// GraphQL endpoint path.
pub const GRAPHQL_PATH: &str = "/chat";

/// Build the gateway router.
#[must_use]
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(REST_PATH, post(rest::chat).options(cors::preflight))
        .route(GRAPHQL_PATH, post(graphql::handler).options(cors::preflight))
        .fallback(fallback)
        .with_state(state)
}

/// Unmatched paths: preflight for `OPTIONS`, bodyless 404 for the rest.
async fn fallback(state: State<AppState>, method: Method, headers: HeaderMap) -> Response {
    if method == Method::OPTIONS {
        return cors::preflight(state, headers).await;
    }
    StatusCode::NOT_FOUND.into_response()
}
