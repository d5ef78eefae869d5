//! Origin allow-listing for cross-origin requests.

/// Decides whether a request's declared origin may call the gateway.
///
/// Known weak points, inherited deliberately from the deployed behavior and
/// documented rather than tightened:
/// - an unset allow-list defaults to the wildcard (allow everything);
/// - requests with no `Origin` header are always allowed, on the assumption
///   they are same-origin or non-browser API calls.
#[derive(Debug, Clone)]
pub struct OriginPolicy {
    origins: Vec<String>,
}

/// The allow-everything token.
const WILDCARD: &str = "*";

impl OriginPolicy {
    /// Parse a policy from the optional comma-separated configuration value.
    /// Entries are trimmed; unset means wildcard.
    #[must_use]
    pub fn from_config(raw: Option<&str>) -> Self {
        let origins = match raw {
            Some(list) => list.split(',').map(|o| o.trim().to_owned()).collect(),
            None => vec![WILDCARD.to_owned()],
        };
        Self { origins }
    }

    /// Policy that allows every origin.
    #[must_use]
    pub fn allow_all() -> Self {
        Self::from_config(None)
    }

    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.origins.iter().any(|o| o == WILDCARD)
    }

    /// Whether a request carrying `origin` may proceed.
    #[must_use]
    pub fn is_allowed(&self, origin: Option<&str>) -> bool {
        if self.is_wildcard() {
            return true;
        }

        // No Origin header: same-origin or non-browser caller
        let Some(origin) = origin else {
            return true;
        };

        self.origins.iter().any(|o| o == origin)
    }

    /// The value to echo as `Access-Control-Allow-Origin` on a preflight
    /// response, or `None` when the header must be omitted.
    #[must_use]
    pub fn preflight_origin(&self, origin: Option<&str>) -> Option<String> {
        match origin {
            Some(origin) if self.is_wildcard() || self.origins.iter().any(|o| o == origin) => {
                Some(origin.to_owned())
            }
            None if self.is_wildcard() => Some(WILDCARD.to_owned()),
            _ => None,
        }
    }
}
