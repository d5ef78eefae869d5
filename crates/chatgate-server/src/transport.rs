//! Reqwest implementation of the completion transport port.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;

use chatgate_core::{CompletionTransport, TransportError, WireResponse};

/// HTTP transport for upstream completion calls.
///
/// No request timeout is configured here; the call inherits the client's
/// environment defaults, and retry policy belongs to nobody (single attempt
/// per gateway request).
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build the transport with a shared connection pool.
    pub fn new() -> anyhow::Result<Self> {
        let client = Client::builder().pool_max_idle_per_host(10).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl CompletionTransport for HttpTransport {
    async fn post_completion(
        &self,
        endpoint: &str,
        api_key: &str,
        payload: Vec<u8>,
    ) -> Result<WireResponse, TransportError> {
        let response = self
            .client
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json")
            .bearer_auth(api_key)
            .body(payload)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        Ok(WireResponse::new(status, body.to_vec()))
    }
}
