//! The gateway's single error currency.
//!
//! Every failure, whether from validation, upstream HTTP classification, or
//! a transport fault, funnels through [`GatewayError`] so both adapters can
//! render it without knowing where it came from. The machine-readable tags
//! are part of the wire contract with existing clients; they keep their
//! original spellings (including `DEEPSEEK_API_ERROR`).

use serde_json::Value;
use thiserror::Error;

/// Machine-readable error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingMessage,
    InvalidMessageType,
    EmptyMessage,
    MessageTooLong,
    InvalidJson,
    MissingApiKey,
    InsufficientBalance,
    InvalidApiKey,
    RateLimitExceeded,
    AccessDenied,
    DeepseekApiError,
    EmptyResponse,
    NetworkError,
    InternalError,
}

impl ErrorKind {
    /// The stable tag clients switch on.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::MissingMessage => "MISSING_MESSAGE",
            Self::InvalidMessageType => "INVALID_MESSAGE_TYPE",
            Self::EmptyMessage => "EMPTY_MESSAGE",
            Self::MessageTooLong => "MESSAGE_TOO_LONG",
            Self::InvalidJson => "INVALID_JSON",
            Self::MissingApiKey => "MISSING_API_KEY",
            Self::InsufficientBalance => "INSUFFICIENT_BALANCE",
            Self::InvalidApiKey => "INVALID_API_KEY",
            Self::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            Self::AccessDenied => "ACCESS_DENIED",
            Self::DeepseekApiError => "DEEPSEEK_API_ERROR",
            Self::EmptyResponse => "EMPTY_RESPONSE",
            Self::NetworkError => "NETWORK_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }
}

/// Typed error carried from the core up through both protocol adapters.
///
/// `status` is the HTTP status the REST adapter responds with; for classified
/// upstream failures it is the provider's original status. `kind` is absent
/// for untagged failures (origin rejection, generic internal error), which
/// render with no `errorType` field. `detail` holds the raw upstream error
/// body for diagnostics and is never sent to clients.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct GatewayError {
    pub message: String,
    pub status: u16,
    pub kind: Option<ErrorKind>,
    pub detail: Option<Value>,
}

impl GatewayError {
    /// A 400 validation failure with a tag.
    #[must_use]
    pub fn validation(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: 400,
            kind: Some(kind),
            detail: None,
        }
    }

    /// Request body was not valid JSON.
    #[must_use]
    pub fn invalid_json() -> Self {
        Self::validation(ErrorKind::InvalidJson, "Invalid JSON in request body")
    }

    /// No credential configured; raised before any network call.
    #[must_use]
    pub fn missing_api_key() -> Self {
        Self {
            message: "DeepSeek API key not configured".to_owned(),
            status: 500,
            kind: Some(ErrorKind::MissingApiKey),
            detail: None,
        }
    }

    /// A classified non-success response from the provider, keeping its
    /// original HTTP status and raw error body.
    #[must_use]
    pub fn upstream(kind: ErrorKind, message: impl Into<String>, status: u16, detail: Value) -> Self {
        Self {
            message: message.into(),
            status,
            kind: Some(kind),
            detail: Some(detail),
        }
    }

    /// Provider answered 2xx but returned no completion choices.
    #[must_use]
    pub fn empty_response() -> Self {
        Self {
            message: "No response from DeepSeek API".to_owned(),
            status: 500,
            kind: Some(ErrorKind::EmptyResponse),
            detail: None,
        }
    }

    /// Transport fault or unparseable success body.
    #[must_use]
    pub fn network(cause: impl std::fmt::Display) -> Self {
        Self {
            message: format!("Failed to call DeepSeek API: {cause}"),
            status: 500,
            kind: Some(ErrorKind::NetworkError),
            detail: None,
        }
    }

    /// Origin rejected by the allow-list. Untagged, like the original body.
    #[must_use]
    pub fn origin_not_allowed() -> Self {
        Self {
            message: "Origin not allowed".to_owned(),
            status: 403,
            kind: None,
            detail: None,
        }
    }

    /// Catch-all for failures with no classification.
    #[must_use]
    pub fn internal() -> Self {
        Self {
            message: "Internal server error".to_owned(),
            status: 500,
            kind: None,
            detail: None,
        }
    }

    /// The stable tag to expose as `errorType`, if any.
    #[must_use]
    pub fn tag(&self) -> Option<&'static str> {
        self.kind.map(|k| k.tag())
    }
}
