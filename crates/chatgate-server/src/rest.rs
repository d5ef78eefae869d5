//! Legacy REST adapter.
//!
//! Accepts `POST` bodies as JSON, delegates to the core normalizer and
//! upstream client, and renders the canonical [`ChatResponse`] shape for
//! both success and error outcomes. Kept for backward compatibility with
//! pre-GraphQL clients.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::{CONTENT_TYPE, ORIGIN};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, warn};

use chatgate_core::{ChatResponse, GatewayError, complete, normalize};

use crate::cors;
use crate::state::AppState;

/// Handle `POST` on the legacy chat path.
pub async fn chat(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let origin = headers.get(ORIGIN).and_then(|v| v.to_str().ok());

    if !state.config.origin_policy.is_allowed(origin) {
        warn!(?origin, "rejected disallowed origin");
        return render_error(&GatewayError::origin_not_allowed());
    }

    match handle_chat(&state, &body).await {
        Ok(response) => render(StatusCode::OK, &response),
        Err(err) => {
            error!(status = err.status, error = %err, "chat request failed");
            render_error(&err)
        }
    }
}

async fn handle_chat(state: &AppState, body: &[u8]) -> Result<ChatResponse, GatewayError> {
    // JSON parse failure beats every other check
    let value: Value = serde_json::from_slice(body).map_err(|_| GatewayError::invalid_json())?;
    let request = normalize(&value)?;
    complete(&request, &state.config, state.transport.as_ref()).await
}

fn render_error(err: &GatewayError) -> Response {
    let status = StatusCode::from_u16(err.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = ChatResponse::failure(err.message.clone(), err.tag());
    render(status, &body)
}

/// Serialize a response body with the permissive CORS header set. A body
/// that will not serialize degrades to the generic 500.
fn render<T: Serialize>(status: StatusCode, body: &T) -> Response {
    let (status, bytes) = match serde_json::to_vec(body) {
        Ok(bytes) => (status, bytes),
        Err(err) => {
            error!(error = %err, "response serialization failed");
            let fallback = GatewayError::internal();
            let body = ChatResponse::failure(fallback.message, None);
            // ChatResponse is plain data; this serialization cannot fail
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::to_vec(&body).unwrap_or_default(),
            )
        }
    };

    let mut response = (status, bytes).into_response();
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    cors::apply_permissive(response.headers_mut());
    response
}
