//! Domain types for the gateway.

mod chat;

pub use chat::{
    ChatMessage, ChatRequest, ChatResponse, ChatRole, ResponseStatus, TokenUsage, iso_timestamp,
};
