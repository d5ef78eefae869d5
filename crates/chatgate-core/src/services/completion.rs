//! The upstream completion client.
//!
//! Translates a canonical [`ChatRequest`] into the DeepSeek wire format,
//! performs exactly one call through the [`CompletionTransport`] port, and
//! maps the outcome back into a [`ChatResponse`] or a classified
//! [`GatewayError`]. No retries anywhere in this path.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::config::GatewayConfig;
use crate::domain::{ChatMessage, ChatRequest, ChatResponse, TokenUsage};
use crate::error::{ErrorKind, GatewayError};
use crate::ports::CompletionTransport;
use crate::validate::build_messages;

/// Fixed upstream completions endpoint.
pub const COMPLETIONS_URL: &str = "https://api.deepseek.com/chat/completions";

/// Model used when the request does not name one.
pub const DEFAULT_MODEL: &str = "deepseek-chat";

/// Sampling temperature used when the request does not set one.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Token budget used when the request does not set one.
pub const DEFAULT_MAX_TOKENS: u32 = 2048;

/// Request body for the DeepSeek completions endpoint. Streaming is never
/// requested.
#[derive(Debug, Serialize)]
struct CompletionPayload {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

/// Success body from the completions endpoint. Only the fields the gateway
/// consumes are modeled; a missing `choices` array reads as empty.
#[derive(Debug, Deserialize)]
struct CompletionReply {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
    #[serde(default)]
    usage: Option<TokenUsage>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: String,
}

/// Forward a chat request to the completions API.
///
/// # Errors
///
/// - `MISSING_API_KEY` (500) when no credential is configured; the transport
///   is never invoked in that case.
/// - A classified error carrying the provider's HTTP status for non-success
///   responses (see [`classify_failure`]).
/// - `EMPTY_RESPONSE` (500) when a success body has no choices.
/// - `NETWORK_ERROR` (500) for transport faults and unparseable success
///   bodies.
pub async fn complete(
    request: &ChatRequest,
    config: &GatewayConfig,
    transport: &dyn CompletionTransport,
) -> Result<ChatResponse, GatewayError> {
    let Some(api_key) = config.api_key.as_deref() else {
        return Err(GatewayError::missing_api_key());
    };

    let payload = CompletionPayload {
        model: request
            .model
            .clone()
            .unwrap_or_else(|| DEFAULT_MODEL.to_owned()),
        messages: build_messages(request),
        temperature: request.temperature.unwrap_or(DEFAULT_TEMPERATURE),
        max_tokens: request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        stream: false,
    };

    debug!(model = %payload.model, turns = payload.messages.len(), "forwarding completion request");

    let body = serde_json::to_vec(&payload).map_err(GatewayError::network)?;
    let reply = transport
        .post_completion(COMPLETIONS_URL, api_key, body)
        .await
        .map_err(GatewayError::network)?;

    if !reply.is_success() {
        return Err(classify_failure(reply.status, &reply.body));
    }

    let parsed: CompletionReply =
        serde_json::from_slice(&reply.body).map_err(GatewayError::network)?;

    let Some(first) = parsed.choices.into_iter().next() else {
        return Err(GatewayError::empty_response());
    };

    Ok(ChatResponse::success(first.message.content, parsed.usage))
}

/// Map a non-success provider response to a classified error.
///
/// The raw body is kept on the error for diagnostics; a malformed or absent
/// body reads as an empty structure. Precedence: insufficient balance (by
/// status 402 or by message text, case-insensitive), then 401, 429, 403,
/// then the provider's own message under the generic tag.
fn classify_failure(status: u16, body: &[u8]) -> GatewayError {
    let detail: Value = serde_json::from_slice(body).unwrap_or_else(|_| Value::Object(Default::default()));

    let provider_message = detail
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .map(str::to_owned);

    let message = provider_message.unwrap_or_else(|| format!("DeepSeek API error: {status}"));

    let (kind, message) =
        if status == 402 || message.to_lowercase().contains("insufficient balance") {
            (
                ErrorKind::InsufficientBalance,
                "Insufficient account balance; top up your DeepSeek account to continue.".to_owned(),
            )
        } else if status == 401 {
            (
                ErrorKind::InvalidApiKey,
                "Invalid API key; check the configuration.".to_owned(),
            )
        } else if status == 429 {
            (
                ErrorKind::RateLimitExceeded,
                "Too many requests; try again later.".to_owned(),
            )
        } else if status == 403 {
            (
                ErrorKind::AccessDenied,
                "API access denied; check permission configuration.".to_owned(),
            )
        } else {
            (ErrorKind::DeepseekApiError, message)
        };

    GatewayError::upstream(kind, message, status, detail)
}
