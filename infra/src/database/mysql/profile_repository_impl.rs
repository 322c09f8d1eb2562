//! MySQL implementation of the ProfileRepository trait.
//!
//! Persists per-user key/value attributes (attribution values captured at
//! entry time and the marketing consent flag) using SQLx. Writes are
//! idempotent upserts keyed on `(user_id, attribute_key)`.

use async_trait::async_trait;
use sqlx::MySqlPool;
use uuid::Uuid;

use qr_core::errors::DomainError;
use qr_core::repositories::ProfileRepository;

/// MySQL implementation of ProfileRepository
pub struct MySqlProfileRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlProfileRepository {
    /// Create a new MySQL profile repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for MySqlProfileRepository {
    async fn set_attribute(
        &self,
        user_id: Uuid,
        key: &str,
        value: &str,
    ) -> Result<(), DomainError> {
        let query = r#"
            INSERT INTO user_attributes (user_id, attribute_key, attribute_value)
            VALUES (?, ?, ?)
            ON DUPLICATE KEY UPDATE attribute_value = VALUES(attribute_value)
        "#;

        sqlx::query(query)
            .bind(user_id.to_string())
            .bind(key)
            .bind(value)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to set profile attribute: {}", e),
            })?;

        Ok(())
    }
}
