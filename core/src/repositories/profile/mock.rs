//! In-memory implementation of ProfileRepository for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::DomainError;

use super::r#trait::ProfileRepository;

/// In-memory profile repository recording every write
#[derive(Clone, Default)]
pub struct MockProfileRepository {
    attributes: Arc<RwLock<HashMap<(Uuid, String), String>>>,
}

impl MockProfileRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Read back an attribute, for test assertions
    pub async fn attribute(&self, user_id: Uuid, key: &str) -> Option<String> {
        let attributes = self.attributes.read().await;
        attributes.get(&(user_id, key.to_string())).cloned()
    }
}

#[async_trait]
impl ProfileRepository for MockProfileRepository {
    async fn set_attribute(
        &self,
        user_id: Uuid,
        key: &str,
        value: &str,
    ) -> Result<(), DomainError> {
        let mut attributes = self.attributes.write().await;
        attributes.insert((user_id, key.to_string()), value.to_string());
        Ok(())
    }
}
