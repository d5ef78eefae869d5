//! GraphQL adapter.
//!
//! Exposes `Query.health`, `Query.apiConfig`, and `Mutation.sendMessage`
//! over the same core validation and upstream client the REST path uses.
//! Failures never surface as GraphQL-level errors: every outcome renders as
//! a normal `ChatResponse` object, with `status: ERROR` and populated
//! `error`/`errorType` fields on failure, so callers always receive HTTP 200
//! with a domain-level error envelope.

use std::sync::Arc;

use async_graphql::{Context, EmptySubscription, Enum, InputObject, Object, Schema, SimpleObject};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use tracing::error;

use chatgate_core::domain::iso_timestamp;
use chatgate_core::{
    ChatMessage, ChatRequest, CompletionTransport, GatewayConfig, GatewayError, MAX_MESSAGE_CHARS,
    complete, validate,
};

use crate::cors;
use crate::state::AppState;

/// Version string reported by `health` and `apiConfig`.
const API_VERSION: &str = "2.0.0-graphql";

/// Models advertised by `apiConfig`.
const SUPPORTED_MODELS: &[&str] = &["deepseek-chat", "deepseek-coder"];

pub type GatewaySchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the executable schema with the shared config and transport
/// installed as context data.
#[must_use]
pub fn build_schema(
    config: Arc<GatewayConfig>,
    transport: Arc<dyn CompletionTransport>,
) -> GatewaySchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(config)
        .data(transport)
        .finish()
}

/// Axum handler for the GraphQL endpoint.
pub async fn handler(State(state): State<AppState>, request: GraphQLRequest) -> Response {
    let reply = state.schema.execute(request.into_inner()).await;
    let mut response = GraphQLResponse::from(reply).into_response();
    cors::apply_permissive(response.headers_mut());
    response
}

/// Message role as exposed in the schema. Lowered to the canonical role
/// before reaching the core.
#[derive(Debug, Enum, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
    System,
}

impl From<ChatRole> for chatgate_core::ChatRole {
    fn from(role: ChatRole) -> Self {
        match role {
            ChatRole::User => Self::User,
            ChatRole::Assistant => Self::Assistant,
            ChatRole::System => Self::System,
        }
    }
}

#[derive(Debug, InputObject)]
pub struct ChatMessageInput {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, InputObject)]
pub struct SendMessageInput {
    pub message: String,
    pub messages: Option<Vec<ChatMessageInput>>,
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<i32>,
}

impl SendMessageInput {
    /// Lower the GraphQL input into the canonical request shape.
    #[allow(clippy::cast_possible_truncation)]
    fn into_chat_request(self) -> ChatRequest {
        ChatRequest {
            message: Some(self.message),
            messages: self.messages.map(|history| {
                history
                    .into_iter()
                    .map(|m| ChatMessage::new(m.role.into(), m.content))
                    .collect()
            }),
            user_id: self.user_id,
            session_id: self.session_id,
            model: self.model,
            temperature: self.temperature.map(|t| t as f32),
            max_tokens: self.max_tokens.and_then(|t| u32::try_from(t).ok()),
        }
    }
}

/// Outcome discriminant mirrored from the core's response status.
#[derive(Debug, Enum, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStatus {
    Success,
    Error,
}

#[derive(Debug, SimpleObject)]
#[graphql(name = "TokenUsage")]
pub struct TokenUsage {
    pub prompt_tokens: i32,
    pub completion_tokens: i32,
    pub total_tokens: i32,
}

impl From<chatgate_core::TokenUsage> for TokenUsage {
    fn from(usage: chatgate_core::TokenUsage) -> Self {
        Self {
            prompt_tokens: saturating_int(usage.prompt_tokens),
            completion_tokens: saturating_int(usage.completion_tokens),
            total_tokens: saturating_int(usage.total_tokens),
        }
    }
}

fn saturating_int(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Mutation result, mirroring the canonical `ChatResponse` inside the
/// GraphQL envelope.
#[derive(Debug, SimpleObject)]
#[graphql(name = "ChatResponse")]
pub struct ChatResult {
    pub reply: String,
    pub status: ResponseStatus,
    pub timestamp: String,
    pub usage: Option<TokenUsage>,
    pub error: Option<String>,
    pub error_type: Option<String>,
}

impl ChatResult {
    fn success(response: chatgate_core::ChatResponse) -> Self {
        Self {
            reply: response.reply,
            status: ResponseStatus::Success,
            timestamp: response.timestamp,
            usage: response.usage.map(TokenUsage::from),
            error: None,
            error_type: None,
        }
    }

    fn failure(err: &GatewayError) -> Self {
        Self {
            reply: String::new(),
            status: ResponseStatus::Error,
            timestamp: iso_timestamp(),
            usage: None,
            error: Some(err.message.clone()),
            error_type: Some(err.tag().unwrap_or("INTERNAL_ERROR").to_owned()),
        }
    }

    fn internal() -> Self {
        Self {
            reply: String::new(),
            status: ResponseStatus::Error,
            timestamp: iso_timestamp(),
            usage: None,
            error: Some("Internal server error".to_owned()),
            error_type: Some("INTERNAL_ERROR".to_owned()),
        }
    }
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn health(&self) -> HealthStatus {
        HealthStatus {
            status: "OK".to_owned(),
            timestamp: iso_timestamp(),
            version: API_VERSION.to_owned(),
        }
    }

    async fn api_config(&self) -> ApiConfig {
        ApiConfig {
            version: API_VERSION.to_owned(),
            supported_models: SUPPORTED_MODELS.iter().map(|&m| m.to_owned()).collect(),
            max_tokens: i32::try_from(MAX_MESSAGE_CHARS).unwrap_or(i32::MAX),
            timestamp: iso_timestamp(),
        }
    }
}

#[derive(Debug, SimpleObject)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
    pub version: String,
}

#[derive(Debug, SimpleObject)]
#[graphql(name = "APIConfig")]
pub struct ApiConfig {
    pub version: String,
    pub supported_models: Vec<String>,
    pub max_tokens: i32,
    pub timestamp: String,
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Send a chat message. Never resolves to a GraphQL error; failures
    /// come back as `status: ERROR` with `error`/`errorType` set.
    async fn send_message(&self, ctx: &Context<'_>, input: SendMessageInput) -> ChatResult {
        match send_message_inner(ctx, input).await {
            Ok(result) => result,
            Err(err) => {
                error!(error = %err.message, "sendMessage failed without classification");
                ChatResult::internal()
            }
        }
    }
}

/// The fallible body of `sendMessage`. The outer resolver converts any
/// escaped error into the generic internal envelope.
async fn send_message_inner(
    ctx: &Context<'_>,
    input: SendMessageInput,
) -> Result<ChatResult, async_graphql::Error> {
    let config = ctx.data::<Arc<GatewayConfig>>()?;
    let transport = ctx.data::<Arc<dyn CompletionTransport>>()?;

    let request = input.into_chat_request();

    if let Err(err) = validate(&request) {
        return Ok(ChatResult::failure(&err));
    }

    match complete(&request, config, transport.as_ref()).await {
        Ok(response) => Ok(ChatResult::success(response)),
        Err(err) => {
            error!(status = err.status, error = %err, "sendMessage upstream failure");
            Ok(ChatResult::failure(&err))
        }
    }
}
