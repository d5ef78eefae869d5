//! Shared application state.

use std::sync::Arc;

use chatgate_core::{CompletionTransport, GatewayConfig};

use crate::graphql::{GatewaySchema, build_schema};

/// Per-process state handed to every handler.
///
/// Everything in here is immutable after startup; requests share no mutable
/// state with each other.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub transport: Arc<dyn CompletionTransport>,
    pub schema: GatewaySchema,
}

impl AppState {
    #[must_use]
    pub fn new(config: GatewayConfig, transport: Arc<dyn CompletionTransport>) -> Self {
        let config = Arc::new(config);
        let schema = build_schema(Arc::clone(&config), Arc::clone(&transport));
        Self {
            config,
            transport,
            schema,
        }
    }
}
