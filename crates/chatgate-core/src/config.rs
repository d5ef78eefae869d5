//! Gateway configuration.
//!
//! Read once at startup and passed down explicitly, never through a
//! singleton, so the core stays testable without environment coupling.

use crate::origin::OriginPolicy;

/// Environment variable holding the upstream credential.
pub const API_KEY_VAR: &str = "DEEPSEEK_API_KEY";

/// Environment variable holding the comma-separated origin allow-list.
pub const ALLOWED_ORIGINS_VAR: &str = "ALLOWED_ORIGINS";

/// Immutable per-process configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Upstream API credential. When absent, completion calls fail with
    /// `MISSING_API_KEY` without touching the network.
    pub api_key: Option<String>,
    /// Origin allow-list policy.
    pub origin_policy: OriginPolicy,
}

impl GatewayConfig {
    /// Build a config from explicit values.
    #[must_use]
    pub fn new(api_key: Option<String>, allowed_origins: Option<&str>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.is_empty()),
            origin_policy: OriginPolicy::from_config(allowed_origins),
        }
    }

    /// Read configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        let api_key = std::env::var(API_KEY_VAR).ok();
        let allowed = std::env::var(ALLOWED_ORIGINS_VAR).ok();
        Self::new(api_key, allowed.as_deref())
    }
}
