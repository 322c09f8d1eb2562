//! Tests for issuance and two-step validation

use std::sync::Arc;

use chrono::Utc;

use crate::domain::entities::grant::{AccessGrant, MAX_TTL_SECONDS, MIN_TTL_SECONDS};
use crate::errors::{DomainError, TokenError, ValidationError};
use crate::repositories::token_store::{MockTokenStore, TokenStore};
use crate::services::token::{AccessTokenService, TokenCodec, TokenServiceConfig};

fn service(store: Arc<MockTokenStore>) -> AccessTokenService<MockTokenStore> {
    AccessTokenService::new(
        store,
        TokenServiceConfig {
            signing_secret: "test-secret".to_string(),
            default_ttl_seconds: 3600,
        },
    )
}

#[tokio::test]
async fn issued_token_validates() {
    let store = Arc::new(MockTokenStore::new());
    let service = service(store);

    let issued = service
        .issue(5, "https://example.org/lesson", 120)
        .await
        .unwrap();
    let grant = service.validate(&issued.token).await.unwrap();

    assert_eq!(grant, issued.grant);
    assert_eq!(grant.course_id, 5);
}

#[tokio::test]
async fn zero_course_id_fails_and_stores_nothing() {
    let store = Arc::new(MockTokenStore::new());
    let service = service(store.clone());

    let result = service.issue(0, "https://example.org/lesson", 120).await;

    assert!(matches!(
        result,
        Err(DomainError::Validation(ValidationError::InvalidCourseId { course_id: 0 }))
    ));
    assert_eq!(store.len().await, 0);
}

#[tokio::test]
async fn malformed_redirect_fails_and_stores_nothing() {
    let store = Arc::new(MockTokenStore::new());
    let service = service(store.clone());

    for bad in ["not a url", "/relative/path", "ftp://example.org/x", ""] {
        let result = service.issue(5, bad, 120).await;
        assert!(
            matches!(result, Err(DomainError::Validation(_))),
            "redirect {:?} was accepted",
            bad
        );
    }
    assert_eq!(store.len().await, 0);
}

#[tokio::test]
async fn oversized_ttl_is_clamped_and_the_token_validates() {
    let store = Arc::new(MockTokenStore::new());
    let service = service(store);

    let now = Utc::now().timestamp();
    let issued = service
        .issue(5, "https://example.org/lesson", u64::MAX)
        .await
        .unwrap();

    assert!(!issued.grant.is_expired());
    assert!(issued.grant.expires_at <= now + MAX_TTL_SECONDS as i64 + 1);
    assert!(service.validate(&issued.token).await.is_ok());
}

#[tokio::test]
async fn short_ttl_is_clamped_to_the_minimum() {
    let store = Arc::new(MockTokenStore::new());
    let service = service(store);

    let before = Utc::now().timestamp();
    let issued = service
        .issue(5, "https://example.org/lesson", 30)
        .await
        .unwrap();

    assert!(issued.grant.expires_at >= before + MIN_TTL_SECONDS as i64);
}

#[tokio::test]
async fn revoked_token_fails_validation_though_signature_still_verifies() {
    let store = Arc::new(MockTokenStore::new());
    let service = service(store);

    let issued = service
        .issue(5, "https://example.org/lesson", 120)
        .await
        .unwrap();
    assert!(service.revoke(&issued.token).await.unwrap());

    // The signature alone is still intact
    let codec = TokenCodec::new(b"test-secret".to_vec());
    assert!(codec.verify(&issued.token).is_ok());

    // But the store entry is gone, so the token is dead
    assert!(matches!(
        service.validate(&issued.token).await,
        Err(DomainError::Token(TokenError::NotInStore))
    ));
}

#[tokio::test]
async fn diverging_stored_grant_fails_validation() {
    let store = Arc::new(MockTokenStore::new());
    let service = service(store.clone());

    let issued = service
        .issue(5, "https://example.org/lesson", 120)
        .await
        .unwrap();

    // Swap the stored copy for one with a different expiry
    let mut swapped = issued.grant.clone();
    swapped.expires_at += 600;
    store.put(&issued.token, &swapped, 120).await.unwrap();

    assert!(matches!(
        service.validate(&issued.token).await,
        Err(DomainError::Token(TokenError::StoreMismatch))
    ));
}

#[tokio::test]
async fn expired_grant_fails_validation_even_with_a_live_store_entry() {
    let store = Arc::new(MockTokenStore::new());
    let service = service(store.clone());

    let mut grant = AccessGrant::new(5, "https://example.org/lesson".to_string(), 120);
    grant.expires_at = Utc::now().timestamp() - 10;

    let codec = TokenCodec::new(b"test-secret".to_vec());
    let token = codec.sign(&grant).unwrap();
    store.put(&token, &grant, 120).await.unwrap();

    assert!(matches!(
        service.validate(&token).await,
        Err(DomainError::Token(TokenError::Expired))
    ));
}

#[tokio::test]
async fn unknown_token_fails_validation() {
    let store = Arc::new(MockTokenStore::new());
    let service = service(store);

    let codec = TokenCodec::new(b"test-secret".to_vec());
    let grant = AccessGrant::new(5, "https://example.org/lesson".to_string(), 120);
    let token = codec.sign(&grant).unwrap();

    // Correctly signed but never stored
    assert!(matches!(
        service.validate(&token).await,
        Err(DomainError::Token(TokenError::NotInStore))
    ));
}
