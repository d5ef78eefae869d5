//! Chat domain types.
//!
//! These are the canonical, protocol-agnostic shapes of a chat exchange.
//! Both the REST and GraphQL adapters translate into and out of these types;
//! nothing here knows about HTTP framing.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// The role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl ChatRole {
    /// Parse a role from its lowercase wire representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "system" => Some(Self::System),
            "user" => Some(Self::User),
            "assistant" => Some(Self::Assistant),
            _ => None,
        }
    }

    /// Convert role to its wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for ChatRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single chat message. Immutable once constructed; a message has no
/// identity beyond its position in a sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    #[must_use]
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Canonical chat request.
///
/// At least one of `message` or `messages` must be present; this is enforced
/// by [`crate::validate::validate`], not by construction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub messages: Option<Vec<ChatMessage>>,
    #[serde(default, rename = "userId")]
    pub user_id: Option<String>,
    #[serde(default, rename = "sessionId")]
    pub session_id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

/// Outcome discriminant of a [`ChatResponse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// Provider token-usage figures, carried through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Canonical chat response, for both success and error outcomes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
    pub status: ResponseStatus,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(rename = "errorType", skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

impl ChatResponse {
    /// Build a success response stamped with the current time.
    #[must_use]
    pub fn success(reply: impl Into<String>, usage: Option<TokenUsage>) -> Self {
        Self {
            reply: reply.into(),
            status: ResponseStatus::Success,
            timestamp: iso_timestamp(),
            error: None,
            error_type: None,
            usage,
        }
    }

    /// Build an error-shaped response (`reply: ""`, `status: error`).
    #[must_use]
    pub fn failure(message: impl Into<String>, error_type: Option<&str>) -> Self {
        Self {
            reply: String::new(),
            status: ResponseStatus::Error,
            timestamp: iso_timestamp(),
            error: Some(message.into()),
            error_type: error_type.map(str::to_owned),
            usage: None,
        }
    }
}

/// Current time as ISO-8601 with millisecond precision.
#[must_use]
pub fn iso_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_wire_form() {
        for role in [ChatRole::System, ChatRole::User, ChatRole::Assistant] {
            assert_eq!(ChatRole::parse(role.as_str()), Some(role));
        }
        assert_eq!(ChatRole::parse("tool"), None);
    }

    #[test]
    fn error_response_omits_empty_fields() {
        let rendered = serde_json::to_value(ChatResponse::success("hi", None)).unwrap();
        assert!(rendered.get("error").is_none());
        assert!(rendered.get("errorType").is_none());
        assert!(rendered.get("usage").is_none());
        assert_eq!(rendered["status"], "success");
    }

    #[test]
    fn failure_response_carries_type_tag() {
        let rendered =
            serde_json::to_value(ChatResponse::failure("nope", Some("EMPTY_MESSAGE"))).unwrap();
        assert_eq!(rendered["reply"], "");
        assert_eq!(rendered["status"], "error");
        assert_eq!(rendered["errorType"], "EMPTY_MESSAGE");
    }

    #[test]
    fn request_accepts_wire_field_names() {
        let req: ChatRequest = serde_json::from_value(serde_json::json!({
            "message": "hello",
            "userId": "u-1",
            "sessionId": "s-1",
            "max_tokens": 512
        }))
        .unwrap();
        assert_eq!(req.user_id.as_deref(), Some("u-1"));
        assert_eq!(req.session_id.as_deref(), Some("s-1"));
        assert_eq!(req.max_tokens, Some(512));
    }
}
