//! Redis-backed token store implementation
//!
//! Stores serialized access grants under hashed token keys with Redis TTL
//! eviction doing the natural-expiry half of revocation. Key pattern:
//! `{prefix}token:{sha256(token)}` - the raw token never appears in Redis
//! keys or logs.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::cache::RedisClient;
use qr_core::domain::entities::grant::AccessGrant;
use qr_core::errors::DomainError;
use qr_core::repositories::TokenStore;

/// Default key prefix when none is configured
const DEFAULT_KEY_PREFIX: &str = "qr_access:";

/// Redis implementation of the token store port
#[derive(Clone)]
pub struct RedisTokenStore {
    /// Redis client for cache operations
    redis_client: RedisClient,
    /// Namespace prefix for all keys written by this store
    key_prefix: String,
}

impl RedisTokenStore {
    /// Create a new Redis token store
    ///
    /// # Arguments
    /// * `redis_client` - Redis client for cache operations
    /// * `key_prefix` - Optional namespace prefix, defaults to `qr_access:`
    pub fn new(redis_client: RedisClient, key_prefix: Option<String>) -> Self {
        Self {
            redis_client,
            key_prefix: key_prefix.unwrap_or_else(|| DEFAULT_KEY_PREFIX.to_string()),
        }
    }

    /// Format the Redis key for a token
    ///
    /// The token is hashed so the key stays fixed-length and the signed
    /// token itself never leaves the request path.
    fn format_key(&self, token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{}token:{}", self.key_prefix, hex::encode(hasher.finalize()))
    }
}

#[async_trait]
impl TokenStore for RedisTokenStore {
    async fn put(
        &self,
        token: &str,
        grant: &AccessGrant,
        ttl_seconds: u64,
    ) -> Result<(), DomainError> {
        let key = self.format_key(token);
        let payload = serde_json::to_string(grant).map_err(|e| DomainError::Internal {
            message: format!("Failed to serialize grant: {}", e),
        })?;

        self.redis_client
            .set_with_expiry(&key, &payload, ttl_seconds)
            .await?;

        debug!(course_id = grant.course_id, ttl_seconds, "stored grant entry");
        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<AccessGrant>, DomainError> {
        let key = self.format_key(token);

        let Some(payload) = self.redis_client.get(&key).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&payload) {
            Ok(grant) => Ok(Some(grant)),
            Err(e) => {
                // Treat a corrupt entry like an absent one; the token is
                // unusable either way
                warn!("Discarding unparseable grant entry: {}", e);
                let _ = self.redis_client.delete(&key).await;
                Ok(None)
            }
        }
    }

    async fn delete(&self, token: &str) -> Result<bool, DomainError> {
        let key = self.format_key(token);
        let deleted = self.redis_client.delete(&key).await?;
        debug!(deleted, "deleted grant entry");
        Ok(deleted)
    }
}
