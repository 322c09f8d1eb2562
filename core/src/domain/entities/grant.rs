//! Access grant entity for signed, time-limited course access tokens.

use chrono::{Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

pub use qr_shared::config::access::{DEFAULT_TTL_SECONDS, MAX_TTL_SECONDS, MIN_TTL_SECONDS};

/// Length of the random nonce embedded in every grant
pub const NONCE_LENGTH: usize = 12;

/// Query parameter marking an inbound QR entry request
pub const QUERY_MARKER: &str = "qr";

/// Query parameter carrying the signed token
pub const TOKEN_PARAM: &str = "t";

/// Payload describing one access grant
///
/// A grant is immutable once signed: the signature covers the exact
/// `serde_json` encoding of this struct, so the wire field names and their
/// declaration order must stay stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessGrant {
    /// Course the bearer gets enrolled into
    #[serde(rename = "cid")]
    pub course_id: u32,

    /// Absolute URL to send the user to after successful processing
    #[serde(rename = "redirect")]
    pub redirect_url: String,

    /// Absolute expiry timestamp (seconds since epoch)
    #[serde(rename = "exp")]
    pub expires_at: i64,

    /// Random string keeping otherwise identical grants distinct
    pub nonce: String,
}

impl AccessGrant {
    /// Creates a new grant expiring `ttl_seconds` from now
    ///
    /// The TTL is clamped to the [`MIN_TTL_SECONDS`]..[`MAX_TTL_SECONDS`]
    /// range: a grant can never be issued already expired or about to
    /// expire, and an oversized TTL cannot overflow the expiry arithmetic.
    ///
    /// # Arguments
    ///
    /// * `course_id` - The target course (must be positive; validated by the caller)
    /// * `redirect_url` - Absolute post-processing redirect target
    /// * `ttl_seconds` - Requested lifetime in seconds
    pub fn new(course_id: u32, redirect_url: String, ttl_seconds: u64) -> Self {
        let ttl = clamp_ttl(ttl_seconds);
        let expires_at = Utc::now() + Duration::seconds(ttl as i64);

        Self {
            course_id,
            redirect_url,
            expires_at: expires_at.timestamp(),
            nonce: generate_nonce(),
        }
    }

    /// Checks whether the grant has expired against the current wall clock
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.expires_at
    }

    /// Checks that the signed grant and its stored copy describe the same access
    ///
    /// The signed token and the store entry must agree on `course_id` and
    /// `expires_at`; divergence means the store entry was swapped out from
    /// under the token and the token must be rejected.
    pub fn matches_stored(&self, stored: &AccessGrant) -> bool {
        self.course_id == stored.course_id && self.expires_at == stored.expires_at
    }
}

/// Clamps a requested TTL to the allowed range
pub fn clamp_ttl(ttl_seconds: u64) -> u64 {
    ttl_seconds.clamp(MIN_TTL_SECONDS, MAX_TTL_SECONDS)
}

/// Generates a random alphanumeric nonce of [`NONCE_LENGTH`] characters
fn generate_nonce() -> String {
    const CHARSET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

    let mut rng = rand::thread_rng();
    (0..NONCE_LENGTH)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grant_creation() {
        let grant = AccessGrant::new(5, "https://example.org/lesson".to_string(), 120);

        assert_eq!(grant.course_id, 5);
        assert_eq!(grant.redirect_url, "https://example.org/lesson");
        assert_eq!(grant.nonce.len(), NONCE_LENGTH);
        assert!(!grant.is_expired());
    }

    #[test]
    fn test_ttl_clamped_to_minimum() {
        let before = Utc::now().timestamp();
        let grant = AccessGrant::new(5, "https://example.org/lesson".to_string(), 30);

        assert!(grant.expires_at >= before + MIN_TTL_SECONDS as i64);
    }

    #[test]
    fn test_oversized_ttl_is_clamped_to_the_maximum() {
        let before = Utc::now().timestamp();

        for huge in [u64::MAX, 10_000_000_000_000_000, MAX_TTL_SECONDS + 1] {
            let grant = AccessGrant::new(5, "https://example.org/lesson".to_string(), huge);

            assert!(!grant.is_expired());
            assert!(grant.expires_at <= before + MAX_TTL_SECONDS as i64 + 1);
        }
    }

    #[test]
    fn test_expiry_check() {
        let mut grant = AccessGrant::new(5, "https://example.org/lesson".to_string(), 120);
        grant.expires_at = Utc::now().timestamp() - 1;

        assert!(grant.is_expired());
    }

    #[test]
    fn test_nonces_differ_for_identical_inputs() {
        let a = AccessGrant::new(5, "https://example.org/lesson".to_string(), 120);
        let b = AccessGrant::new(5, "https://example.org/lesson".to_string(), 120);

        assert_ne!(a.nonce, b.nonce);
    }

    #[test]
    fn test_matches_stored() {
        let grant = AccessGrant::new(5, "https://example.org/lesson".to_string(), 120);
        let mut stored = grant.clone();
        assert!(grant.matches_stored(&stored));

        stored.expires_at += 1;
        assert!(!grant.matches_stored(&stored));

        let mut other_course = grant.clone();
        other_course.course_id = 6;
        assert!(!grant.matches_stored(&other_course));
    }

    #[test]
    fn test_wire_field_names_are_stable() {
        let grant = AccessGrant {
            course_id: 5,
            redirect_url: "https://example.org/lesson".to_string(),
            expires_at: 1_700_000_000,
            nonce: "abcdef123456".to_string(),
        };

        let json = serde_json::to_string(&grant).unwrap();
        assert_eq!(
            json,
            r#"{"cid":5,"redirect":"https://example.org/lesson","exp":1700000000,"nonce":"abcdef123456"}"#
        );
    }
}
