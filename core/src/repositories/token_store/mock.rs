//! In-memory implementation of TokenStore for testing and local development

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::grant::AccessGrant;
use crate::errors::DomainError;

use super::r#trait::TokenStore;

/// In-memory token store with per-entry expiry
///
/// Entries past their TTL are treated as absent, matching the eviction
/// behavior of the Redis-backed store.
#[derive(Clone, Default)]
pub struct MockTokenStore {
    entries: Arc<RwLock<HashMap<String, (AccessGrant, DateTime<Utc>)>>>,
}

impl MockTokenStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (non-expired) entries, for test assertions
    pub async fn len(&self) -> usize {
        let now = Utc::now();
        let entries = self.entries.read().await;
        entries.values().filter(|(_, expires)| *expires > now).count()
    }
}

#[async_trait]
impl TokenStore for MockTokenStore {
    async fn put(
        &self,
        token: &str,
        grant: &AccessGrant,
        ttl_seconds: u64,
    ) -> Result<(), DomainError> {
        let expires = Utc::now() + Duration::seconds(ttl_seconds as i64);
        let mut entries = self.entries.write().await;
        entries.insert(token.to_string(), (grant.clone(), expires));
        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<AccessGrant>, DomainError> {
        let entries = self.entries.read().await;
        Ok(entries.get(token).and_then(|(grant, expires)| {
            if *expires > Utc::now() {
                Some(grant.clone())
            } else {
                None
            }
        }))
    }

    async fn delete(&self, token: &str) -> Result<bool, DomainError> {
        let mut entries = self.entries.write().await;
        Ok(entries.remove(token).is_some())
    }
}
