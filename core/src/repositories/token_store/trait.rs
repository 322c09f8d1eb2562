//! Token store trait defining the interface for short-lived grant caching.

use async_trait::async_trait;

use crate::domain::entities::grant::AccessGrant;
use crate::errors::DomainError;

/// Store trait for short-lived access grant entries
///
/// The store is the second, independently expiring source of truth next to
/// the signature embedded in the token itself. Deleting an entry immediately
/// invalidates a token whose embedded expiry has not yet elapsed, and a
/// correctly signed token whose entry is absent must be rejected.
///
/// Absence is a normal, expected terminal state (natural expiry or
/// administrative revocation), not an error.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Store a grant under its token string with a time-to-live
    ///
    /// Entries are write-once: concurrent puts for the same token carry the
    /// same grant, so last-writer-wins semantics are acceptable.
    ///
    /// # Arguments
    /// * `token` - The signed token string used as the key
    /// * `grant` - The grant to cache
    /// * `ttl_seconds` - Entry lifetime; implementations must evict after it
    async fn put(
        &self,
        token: &str,
        grant: &AccessGrant,
        ttl_seconds: u64,
    ) -> Result<(), DomainError>;

    /// Look up the grant stored for a token
    ///
    /// # Returns
    /// * `Ok(Some(AccessGrant))` - Entry found and not yet evicted
    /// * `Ok(None)` - No entry (never stored, expired, or revoked)
    /// * `Err(DomainError)` - Store backend failure
    async fn get(&self, token: &str) -> Result<Option<AccessGrant>, DomainError>;

    /// Delete the entry for a token (administrative revocation)
    ///
    /// # Returns
    /// * `Ok(true)` - Entry was present and deleted
    /// * `Ok(false)` - No entry to delete
    async fn delete(&self, token: &str) -> Result<bool, DomainError>;
}
