//! Profile repository trait for per-user key/value records.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::DomainError;

/// Repository trait for user profile attributes
///
/// Attribution values captured at entry time and the marketing consent flag
/// are persisted as per-user key/value records. Writing an existing key
/// overwrites its value.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Write one attribute for a user
    ///
    /// # Arguments
    /// * `user_id` - The user the attribute belongs to
    /// * `key` - Attribute name (e.g. `qr_utm_source`, `qr_marketing_consent`)
    /// * `value` - Attribute value
    async fn set_attribute(
        &self,
        user_id: Uuid,
        key: &str,
        value: &str,
    ) -> Result<(), DomainError>;
}
