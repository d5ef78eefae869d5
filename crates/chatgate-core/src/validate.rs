//! Request normalization and validation.
//!
//! The checks run against `message` only; a request supplying only a
//! `messages` history bypasses all content checks. That is the accepted
//! permissive behavior of the gateway, not a gap to fix here.

use serde_json::Value;

use crate::domain::{ChatMessage, ChatRequest, ChatRole};
use crate::error::{ErrorKind, GatewayError};

/// Maximum accepted `message` length, in characters.
pub const MAX_MESSAGE_CHARS: usize = 32_000;

/// System preamble prepended when the caller sends a bare `message`.
pub const SYSTEM_PREAMBLE: &str =
    "You are a helpful AI assistant. Provide accurate and helpful answers.";

/// Parse a raw JSON body into a canonical [`ChatRequest`].
///
/// Runs the validation checks in order, each short-circuiting on first
/// failure. The type check on `message` has to happen against the raw value,
/// before typed decoding can reject the body wholesale.
pub fn normalize(value: &Value) -> Result<ChatRequest, GatewayError> {
    let message = value.get("message").filter(|v| !v.is_null());
    let messages = value.get("messages").filter(|v| !v.is_null());

    if message.is_none() && messages.is_none() {
        return Err(GatewayError::validation(
            ErrorKind::MissingMessage,
            "Message or messages array is required",
        ));
    }

    if let Some(m) = message
        && !m.is_string()
    {
        return Err(GatewayError::validation(
            ErrorKind::InvalidMessageType,
            "Message must be a string",
        ));
    }

    let request: ChatRequest =
        serde_json::from_value(value.clone()).map_err(|_| GatewayError::invalid_json())?;

    validate(&request)?;
    Ok(request)
}

/// Validate a canonical [`ChatRequest`].
///
/// Shared by both protocol adapters; the GraphQL path arrives here already
/// typed, so the raw type check of [`normalize`] does not apply.
pub fn validate(request: &ChatRequest) -> Result<(), GatewayError> {
    if request.message.is_none() && request.messages.is_none() {
        return Err(GatewayError::validation(
            ErrorKind::MissingMessage,
            "Message or messages array is required",
        ));
    }

    if let Some(message) = &request.message {
        if message.trim().is_empty() {
            return Err(GatewayError::validation(
                ErrorKind::EmptyMessage,
                "Message cannot be empty",
            ));
        }

        if message.chars().count() > MAX_MESSAGE_CHARS {
            return Err(GatewayError::validation(
                ErrorKind::MessageTooLong,
                format!("Message too long (max {MAX_MESSAGE_CHARS} characters)"),
            ));
        }
    }

    Ok(())
}

/// Build the message sequence sent upstream.
///
/// A caller-supplied history is used verbatim, with no validation of its
/// contents. Otherwise the bare `message` becomes a two-turn conversation:
/// the fixed system preamble followed by a user turn.
#[must_use]
pub fn build_messages(request: &ChatRequest) -> Vec<ChatMessage> {
    if let Some(history) = &request.messages {
        return history.clone();
    }

    vec![
        ChatMessage::new(ChatRole::System, SYSTEM_PREAMBLE),
        ChatMessage::new(
            ChatRole::User,
            request.message.clone().unwrap_or_default(),
        ),
    ]
}
