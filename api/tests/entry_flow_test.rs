//! End-to-end tests for the QR entry flow
//!
//! Exercises the full lifecycle against in-memory implementations:
//! issuance, the entry redirect, the login gap, and post-login redemption.

use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::http::{header, StatusCode};
use actix_web::{test, web};
use chrono::Utc;
use uuid::Uuid;

use qr_api::app::create_app;
use qr_api::routes::AppState;
use qr_core::domain::entities::grant::AccessGrant;
use qr_core::repositories::{MockProfileRepository, MockTokenStore, TokenStore};
use qr_core::services::entry::{EntryConfig, ACCESS_COOKIE};
use qr_core::services::{
    AccessTokenService, EntryService, MockCourseEnrollment, RegistrationService, TokenCodec,
    TokenServiceConfig,
};
use qr_shared::config::access::AccessConfig;
use qr_shared::config::server::ServerConfig;

const SIGNING_SECRET: &str = "integration-test-secret";
const ADMIN_KEY: &str = "integration-admin-key";

struct Fixture {
    state: web::Data<AppState<MockTokenStore, MockCourseEnrollment, MockProfileRepository>>,
    tokens: Arc<AccessTokenService<MockTokenStore>>,
    store: Arc<MockTokenStore>,
    enrollment: MockCourseEnrollment,
    profiles: Arc<MockProfileRepository>,
}

fn fixture() -> Fixture {
    let store = Arc::new(MockTokenStore::new());
    let enrollment = MockCourseEnrollment::new();
    let profiles = Arc::new(MockProfileRepository::new());

    let access_config = AccessConfig {
        default_course_id: 5,
        default_redirect_url: "https://courses.example.org/lesson".to_string(),
        default_ttl_seconds: 3600,
        require_consent: true,
        signing_secret: SIGNING_SECRET.to_string(),
        admin_api_key: ADMIN_KEY.to_string(),
    };
    let server_config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 8080,
        public_url: "https://qr.example.org/".to_string(),
        login_url: "https://accounts.example.org/login".to_string(),
    };

    let token_service = Arc::new(AccessTokenService::new(
        store.clone(),
        TokenServiceConfig::from(&access_config),
    ));
    let entry_service = Arc::new(EntryService::new(
        token_service.clone(),
        Arc::new(enrollment.clone()),
        profiles.clone(),
        EntryConfig {
            public_url: server_config.public_url.clone(),
            login_url: server_config.login_url.clone(),
        },
    ));
    let registration_service = Arc::new(RegistrationService::new(
        profiles.clone(),
        access_config.require_consent,
    ));

    let state = web::Data::new(AppState {
        token_service: token_service.clone(),
        entry_service,
        registration_service,
        access_config,
        server_config,
    });

    Fixture {
        state,
        tokens: token_service,
        store,
        enrollment,
        profiles,
    }
}

async fn issued_token(f: &Fixture) -> String {
    f.tokens
        .issue(5, "https://courses.example.org/lesson", 300)
        .await
        .unwrap()
        .token
}

fn set_cookie_names<B>(response: &actix_web::dev::ServiceResponse<B>) -> Vec<String> {
    response
        .response()
        .cookies()
        .map(|c| c.name().to_string())
        .collect()
}

#[actix_rt::test]
async fn full_flow_issue_entry_login_enrolls_and_clears_cookie() {
    let f = fixture();
    let app = test::init_service(create_app(f.state.clone())).await;

    // Admin issues a shareable link
    let issue_req = test::TestRequest::post()
        .uri("/api/v1/access/issue")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", ADMIN_KEY)))
        .set_json(serde_json::json!({
            "course_id": 5,
            "redirect": "https://courses.example.org/lesson",
            "ttl": 300
        }))
        .to_request();
    let issue_body: serde_json::Value = test::call_and_read_body_json(&app, issue_req).await;

    let link = issue_body["link"].as_str().expect("issuance returns a link");
    let token = url::Url::parse(link)
        .unwrap()
        .query_pairs()
        .find(|(k, _)| k == "t")
        .map(|(_, v)| v.into_owned())
        .expect("link carries the token");

    // Anonymous click on the QR link
    let entry_req = test::TestRequest::get()
        .uri(&format!("/?qr=1&t={}&utm_source=poster", token))
        .to_request();
    let entry_resp = test::call_service(&app, entry_req).await;

    assert_eq!(entry_resp.status(), StatusCode::FOUND);
    let location = entry_resp
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(location.starts_with("https://accounts.example.org/login"));

    let cookie_names = set_cookie_names(&entry_resp);
    assert!(cookie_names.contains(&ACCESS_COOKIE.to_string()));
    assert!(cookie_names.contains(&"qr_utm_source".to_string()));

    // The login subsystem reports a successful login, cookies attached
    let user_id = Uuid::new_v4();
    let hook_req = test::TestRequest::post()
        .uri("/api/v1/hooks/login")
        .cookie(Cookie::new(ACCESS_COOKIE, token.clone()))
        .cookie(Cookie::new("qr_utm_source", "poster"))
        .set_json(serde_json::json!({
            "user_id": user_id,
            "requested_redirect": "https://courses.example.org/account"
        }))
        .to_request();
    let hook_resp = test::call_service(&app, hook_req).await;

    assert_eq!(hook_resp.status(), StatusCode::OK);

    // Continuation cookie is cleared
    let removal: Vec<_> = hook_resp
        .response()
        .cookies()
        .filter(|c| c.name() == ACCESS_COOKIE)
        .collect();
    assert_eq!(removal.len(), 1);
    assert!(removal[0].value().is_empty());

    let body: serde_json::Value = test::read_body_json(hook_resp).await;
    assert_eq!(body["redirect_to"], "https://courses.example.org/lesson");

    // Exactly one enrollment, attribution persisted
    assert_eq!(f.enrollment.granted().await, vec![(user_id, 5)]);
    assert_eq!(
        f.profiles.attribute(user_id, "qr_utm_source").await,
        Some("poster".to_string())
    );
}

#[actix_rt::test]
async fn authenticated_entry_skips_the_login_leg() {
    let f = fixture();
    let app = test::init_service(create_app(f.state.clone())).await;
    let token = issued_token(&f).await;

    let user_id = Uuid::new_v4();
    let req = test::TestRequest::get()
        .uri(&format!("/?qr=1&t={}", token))
        .insert_header(("x-authenticated-user", user_id.to_string()))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        "https://courses.example.org/lesson"
    );
    assert_eq!(f.enrollment.granted().await, vec![(user_id, 5)]);
}

#[actix_rt::test]
async fn tampered_link_is_rejected_without_cookies() {
    let f = fixture();
    let app = test::init_service(create_app(f.state.clone())).await;
    let token = issued_token(&f).await;

    let mut tampered = token.into_bytes();
    tampered[10] = if tampered[10] == b'A' { b'B' } else { b'A' };
    let tampered = String::from_utf8(tampered).unwrap();

    let req = test::TestRequest::get()
        .uri(&format!("/?qr=1&t={}", tampered))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert!(set_cookie_names(&resp).is_empty());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Invalid or expired access link");
}

#[actix_rt::test]
async fn missing_marker_is_not_an_entry_request() {
    let f = fixture();
    let app = test::init_service(create_app(f.state.clone())).await;
    let token = issued_token(&f).await;

    let req = test::TestRequest::get()
        .uri(&format!("/?t={}", token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn token_expired_during_registration_falls_back_silently() {
    let f = fixture();
    let app = test::init_service(create_app(f.state.clone())).await;

    // A token whose grant expired while the user filled in the form
    let mut grant = AccessGrant::new(5, "https://courses.example.org/lesson".to_string(), 300);
    grant.expires_at = Utc::now().timestamp() - 10;
    let codec = TokenCodec::new(SIGNING_SECRET.as_bytes().to_vec());
    let token = codec.sign(&grant).unwrap();
    f.store.put(&token, &grant, 300).await.unwrap();

    let user_id = Uuid::new_v4();
    let req = test::TestRequest::post()
        .uri("/api/v1/hooks/login")
        .cookie(Cookie::new(ACCESS_COOKIE, token))
        .set_json(serde_json::json!({
            "user_id": user_id,
            "requested_redirect": "https://courses.example.org/account"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    // Still a 200, no enrollment, default redirect, cookie cleared anyway
    assert_eq!(resp.status(), StatusCode::OK);
    let cleared = set_cookie_names(&resp);
    assert!(cleared.contains(&ACCESS_COOKIE.to_string()));

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["redirect_to"], "https://courses.example.org/account");
    assert!(f.enrollment.granted().await.is_empty());
}

#[actix_rt::test]
async fn concurrent_entries_with_the_same_token_both_succeed() {
    let f = fixture();
    let app = test::init_service(create_app(f.state.clone())).await;
    let token = issued_token(&f).await;

    let first = test::TestRequest::get()
        .uri(&format!("/?qr=1&t={}", token))
        .to_request();
    let second = test::TestRequest::get()
        .uri(&format!("/?qr=1&t={}", token))
        .to_request();

    let (first, second) = tokio::join!(
        test::call_service(&app, first),
        test::call_service(&app, second)
    );

    assert_eq!(first.status(), StatusCode::FOUND);
    assert_eq!(second.status(), StatusCode::FOUND);
}

#[actix_rt::test]
async fn registration_hooks_enforce_and_record_consent() {
    let f = fixture();
    let app = test::init_service(create_app(f.state.clone())).await;

    // Consent is required by this fixture's configuration
    let req = test::TestRequest::post()
        .uri("/api/v1/hooks/registration/validate")
        .set_json(serde_json::json!({ "consent_given": false }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/v1/hooks/registration/validate")
        .set_json(serde_json::json!({ "consent_given": true }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // After the account exists, consent and attribution land on the profile
    let user_id = Uuid::new_v4();
    let req = test::TestRequest::post()
        .uri("/api/v1/hooks/registration/created")
        .cookie(Cookie::new("qr_utm_campaign", "spring"))
        .set_json(serde_json::json!({ "user_id": user_id, "consent_given": true }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    assert_eq!(
        f.profiles.attribute(user_id, "qr_marketing_consent").await,
        Some("1".to_string())
    );
    assert_eq!(
        f.profiles.attribute(user_id, "qr_utm_campaign").await,
        Some("spring".to_string())
    );
}
