//! Main access token service implementation

use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

use crate::domain::entities::grant::{clamp_ttl, AccessGrant};
use crate::errors::{DomainError, TokenError, ValidationError};
use crate::repositories::TokenStore;

use super::codec::TokenCodec;
use super::config::TokenServiceConfig;

/// A freshly issued token together with its grant
#[derive(Debug, Clone)]
pub struct IssuedAccess {
    /// The signed, URL-safe token string
    pub token: String,
    /// The grant embedded in the token and cached in the store
    pub grant: AccessGrant,
}

/// Service managing issuance and validation of signed access tokens
///
/// Every token lives in two places with matching TTLs: the signature embeds
/// the grant, and the store keeps an independently expiring copy. Validation
/// requires both to be present and to agree; deleting the store entry
/// revokes the token regardless of its embedded expiry.
pub struct AccessTokenService<S: TokenStore> {
    store: Arc<S>,
    codec: TokenCodec,
    config: TokenServiceConfig,
}

impl<S: TokenStore> AccessTokenService<S> {
    /// Creates a new token service instance
    ///
    /// # Arguments
    ///
    /// * `store` - Short-lived grant store
    /// * `config` - Signing secret and default TTL
    pub fn new(store: Arc<S>, config: TokenServiceConfig) -> Self {
        let codec = TokenCodec::new(config.signing_secret.as_bytes().to_vec());
        Self {
            store,
            codec,
            config,
        }
    }

    /// TTL used when the issuer does not request one
    pub fn default_ttl(&self) -> u64 {
        self.config.default_ttl_seconds
    }

    /// Issues a new signed access token
    ///
    /// Validates the inputs, clamps the TTL to the allowed range, signs a
    /// fresh grant and caches it under the token string with the same TTL.
    /// Nothing is signed or stored when validation fails.
    ///
    /// # Arguments
    ///
    /// * `course_id` - Target course; must be positive
    /// * `redirect_url` - Absolute http(s) URL for the post-login redirect
    /// * `ttl_seconds` - Requested lifetime
    ///
    /// # Returns
    ///
    /// * `Ok(IssuedAccess)` - The token string and its grant
    /// * `Err(DomainError::Validation)` - Bad course id or redirect URL
    pub async fn issue(
        &self,
        course_id: u32,
        redirect_url: &str,
        ttl_seconds: u64,
    ) -> Result<IssuedAccess, DomainError> {
        if course_id == 0 {
            return Err(ValidationError::InvalidCourseId { course_id }.into());
        }
        if !is_absolute_http_url(redirect_url) {
            return Err(ValidationError::InvalidRedirectUrl {
                url: redirect_url.to_string(),
            }
            .into());
        }

        let ttl = clamp_ttl(ttl_seconds);
        let grant = AccessGrant::new(course_id, redirect_url.to_string(), ttl);
        let token = self.codec.sign(&grant)?;
        self.store.put(&token, &grant, ttl).await?;

        info!(
            course_id,
            expires_at = grant.expires_at,
            "issued access token"
        );

        Ok(IssuedAccess { token, grant })
    }

    /// Validates a token against both the signature and the store
    ///
    /// The four checks run in order: signature (codec), store presence,
    /// exact `course_id`/`expires_at` agreement between the signed and the
    /// stored copy, and wall-clock expiry at the time of this call.
    ///
    /// # Returns
    ///
    /// * `Ok(AccessGrant)` - The trusted grant
    /// * `Err(DomainError::Token)` - Any failed check; callers must surface
    ///   every variant as the same generic rejection
    pub async fn validate(&self, token: &str) -> Result<AccessGrant, DomainError> {
        let grant = self.codec.verify(token).map_err(|e| {
            debug!(error = %e, "token rejected by codec");
            DomainError::Token(e)
        })?;

        let stored = self
            .store
            .get(token)
            .await?
            .ok_or(DomainError::Token(TokenError::NotInStore))?;

        if !grant.matches_stored(&stored) {
            debug!("token rejected: signed grant diverges from stored grant");
            return Err(TokenError::StoreMismatch.into());
        }

        if grant.is_expired() {
            return Err(TokenError::Expired.into());
        }

        Ok(grant)
    }

    /// Revokes a token by deleting its store entry
    ///
    /// A revoked token fails validation even though its signature and
    /// embedded expiry would still pass.
    pub async fn revoke(&self, token: &str) -> Result<bool, DomainError> {
        self.store.delete(token).await
    }
}

/// Checks that a string parses as an absolute http(s) URL
fn is_absolute_http_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}
