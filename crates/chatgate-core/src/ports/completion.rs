//! Transport port for the upstream completions API.
//!
//! The upstream client in [`crate::services`] never talks HTTP directly; it
//! goes through this port. The server crate provides the reqwest
//! implementation, tests provide scripted ones, which is what makes the
//! "no network call without a credential" property assertable.

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Raw reply from the upstream endpoint: HTTP status plus unparsed body.
#[derive(Debug, Clone)]
pub struct WireResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl WireResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Connection-level failure: the request never produced an HTTP response.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),
}

/// Port for posting a completion payload upstream.
///
/// One operation, one attempt. Retry policy (there is none) and error
/// classification belong to the caller, not the transport. No local timeout
/// is applied; the transport inherits the host environment's defaults.
#[async_trait]
pub trait CompletionTransport: Send + Sync + fmt::Debug {
    /// POST `payload` as JSON to `endpoint` with a bearer credential.
    ///
    /// Returns the raw response for any HTTP outcome, success or not.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` only when no HTTP response was obtained at
    /// all (connect failure, broken stream).
    async fn post_completion(
        &self,
        endpoint: &str,
        api_key: &str,
        payload: Vec<u8>,
    ) -> Result<WireResponse, TransportError>;
}
