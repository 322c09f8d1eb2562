//! Request and response bodies for the access and hook endpoints

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use qr_core::domain::entities::grant::AccessGrant;

/// Body for `POST /api/v1/access/issue`
///
/// Every field is optional; missing fields fall back to the configured
/// defaults.
#[derive(Debug, Deserialize, Validate)]
pub struct IssueAccessRequest {
    /// Target course; must be positive
    #[validate(range(min = 1, message = "course_id must be positive"))]
    pub course_id: Option<u32>,

    /// Destination after a successful entry; must be an absolute URL
    #[validate(url(message = "redirect must be an absolute URL"))]
    pub redirect: Option<String>,

    /// Requested lifetime in seconds (clamped to the allowed range)
    pub ttl: Option<u64>,
}

/// Response for a successful issuance
#[derive(Debug, Serialize, Deserialize)]
pub struct IssueAccessResponse {
    /// Shareable entry link carrying the token
    pub link: String,
    /// Expiry of the issued grant
    pub expires: DateTime<Utc>,
    /// The signed payload, for the caller's records
    pub payload: AccessGrant,
}

/// Body for `POST /api/v1/access/revoke`
#[derive(Debug, Deserialize)]
pub struct RevokeAccessRequest {
    /// The token string to invalidate
    pub token: String,
}

/// Response for a revocation request
#[derive(Debug, Serialize, Deserialize)]
pub struct RevokeAccessResponse {
    /// Whether a live entry was actually removed
    pub revoked: bool,
}

/// Body for `POST /api/v1/hooks/login`
#[derive(Debug, Deserialize)]
pub struct LoginSucceededRequest {
    /// The user who just logged in
    pub user_id: Uuid,
    /// Redirect target the login subsystem would use by default
    pub requested_redirect: Option<String>,
}

/// Response telling the login subsystem where to send the user
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRedirectResponse {
    pub redirect_to: String,
}

/// Body for `POST /api/v1/hooks/registration/validate`
#[derive(Debug, Deserialize)]
pub struct ValidateRegistrationRequest {
    #[serde(default)]
    pub consent_given: bool,
}

/// Body for `POST /api/v1/hooks/registration/created`
#[derive(Debug, Deserialize)]
pub struct UserCreatedRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub consent_given: bool,
}
