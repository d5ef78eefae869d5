//! Core domain types and port definitions for chatgate.
//!
//! Everything in this crate is protocol-agnostic: the REST and GraphQL
//! adapters in `chatgate-server` are thin front ends over the validation and
//! upstream-completion functions defined here. No HTTP framework or HTTP
//! client appears in this crate; the network is reached only through the
//! [`ports::CompletionTransport`] port.

pub mod config;
pub mod domain;
pub mod error;
pub mod origin;
pub mod ports;
pub mod services;
pub mod validate;

// Re-export commonly used types for convenience
pub use config::GatewayConfig;
pub use domain::{ChatMessage, ChatRequest, ChatResponse, ChatRole, ResponseStatus, TokenUsage};
pub use error::{ErrorKind, GatewayError};
pub use origin::OriginPolicy;
pub use ports::{CompletionTransport, TransportError, WireResponse};
pub use services::{COMPLETIONS_URL, complete};
pub use validate::{MAX_MESSAGE_CHARS, SYSTEM_PREAMBLE, build_messages, normalize, validate};
