//! Access-link configuration module

use serde::{Deserialize, Serialize};

/// Minimum allowed token lifetime in seconds
///
/// Shorter lifetimes are clamped up to this value so a mistyped TTL cannot
/// produce links that expire before anyone can use them.
pub const MIN_TTL_SECONDS: u64 = 60;

/// Maximum allowed token lifetime in seconds (30 days)
///
/// Longer lifetimes are clamped down to this value, so expiry arithmetic
/// never overflows and a mistyped TTL cannot produce an effectively
/// permanent link.
pub const MAX_TTL_SECONDS: u64 = 30 * 24 * 60 * 60;

/// Default token lifetime in seconds (1 hour)
pub const DEFAULT_TTL_SECONDS: u64 = 3600;

/// Configuration for access-link issuance and redemption
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AccessConfig {
    /// Course that links enroll into when the issuer does not override it
    pub default_course_id: u32,

    /// Redirect target used when the issuer does not override it
    pub default_redirect_url: String,

    /// Default token lifetime in seconds (never below [`MIN_TTL_SECONDS`])
    pub default_ttl_seconds: u64,

    /// Whether marketing consent is mandatory at registration
    pub require_consent: bool,

    /// Secret used to sign access tokens (HMAC-SHA256 key)
    pub signing_secret: String,

    /// Bearer key required by the administrative issuance endpoint
    pub admin_api_key: String,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            default_course_id: 0,
            default_redirect_url: String::new(),
            default_ttl_seconds: DEFAULT_TTL_SECONDS,
            require_consent: false,
            signing_secret: String::new(),
            admin_api_key: String::new(),
        }
    }
}

impl AccessConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let default_course_id = std::env::var("QR_DEFAULT_COURSE_ID")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        let default_redirect_url =
            std::env::var("QR_DEFAULT_REDIRECT_URL").unwrap_or_default();
        let default_ttl_seconds = std::env::var("QR_DEFAULT_TTL")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TTL_SECONDS)
            .clamp(MIN_TTL_SECONDS, MAX_TTL_SECONDS);
        let require_consent = std::env::var("QR_REQUIRE_CONSENT")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        // No fallback secrets: an unset signing secret refuses startup and
        // an unset admin key disables the issuance endpoints.
        let signing_secret = std::env::var("QR_SIGNING_SECRET").unwrap_or_default();
        let admin_api_key = std::env::var("QR_ADMIN_API_KEY").unwrap_or_default();

        Self {
            default_course_id,
            default_redirect_url,
            default_ttl_seconds,
            require_consent,
            signing_secret,
            admin_api_key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ttl_is_at_least_the_minimum() {
        let config = AccessConfig::default();
        assert!(config.default_ttl_seconds >= MIN_TTL_SECONDS);
    }
}
