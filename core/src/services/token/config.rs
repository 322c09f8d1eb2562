//! Configuration for the access token service

use qr_shared::config::access::AccessConfig;

/// Configuration for the access token service
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// HMAC-SHA256 signing secret
    pub signing_secret: String,
    /// TTL used when the issuer does not request one
    pub default_ttl_seconds: u64,
}

impl From<&AccessConfig> for TokenServiceConfig {
    fn from(config: &AccessConfig) -> Self {
        Self {
            signing_secret: config.signing_secret.clone(),
            default_ttl_seconds: config.default_ttl_seconds,
        }
    }
}
