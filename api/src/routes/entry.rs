//! Public QR entry route
//!
//! Handles `GET /?qr=1&t=<token>`: validates the token, sets the
//! continuation and attribution cookies, and redirects either straight to
//! the granted content (active session) or to the login subsystem.

use std::collections::HashMap;

use actix_web::cookie::{time::Duration, Cookie, SameSite};
use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use uuid::Uuid;

use crate::dto::ErrorResponse;
use crate::handlers::error::handle_domain_error;
use crate::routes::AppState;

use qr_core::domain::entities::grant::{QUERY_MARKER, TOKEN_PARAM};
use qr_core::repositories::{ProfileRepository, TokenStore};
use qr_core::services::entry::{CookieSpec, EntryRequest, ATTRIBUTION_KEYS};
use qr_core::services::CourseEnrollment;

/// Header an authenticating reverse proxy uses to pass the session user
const AUTHENTICATED_USER_HEADER: &str = "x-authenticated-user";

/// Handler for GET / with the QR entry query parameters
///
/// Requests without the `qr=1` marker are not entry requests and get the
/// default 404 treatment. A rejected token yields a generic 403 with no
/// cookies set.
pub async fn entry<S, E, P>(
    req: HttpRequest,
    state: web::Data<AppState<S, E, P>>,
    query: web::Query<HashMap<String, String>>,
) -> HttpResponse
where
    S: TokenStore + 'static,
    E: CourseEnrollment + 'static,
    P: ProfileRepository + 'static,
{
    if query.get(QUERY_MARKER).map(String::as_str) != Some("1") {
        return HttpResponse::NotFound().json(ErrorResponse::new(
            "not_found",
            "The requested resource was not found",
        ));
    }

    let Some(token) = query.get(TOKEN_PARAM) else {
        return HttpResponse::Forbidden().json(ErrorResponse::new(
            "invalid_token",
            "Invalid or expired access link",
        ));
    };

    let attribution: Vec<(String, String)> = ATTRIBUTION_KEYS
        .iter()
        .filter_map(|key| query.get(*key).map(|v| (key.to_string(), v.clone())))
        .collect();

    let request = EntryRequest {
        token: token.clone(),
        attribution,
        authenticated_user: authenticated_user(&req),
        secure_transport: req.connection_info().scheme() == "https",
    };

    match state.entry_service.handle_entry(request).await {
        Ok(outcome) => {
            let mut response = HttpResponse::Found();
            response.insert_header((header::LOCATION, outcome.location));
            for spec in &outcome.cookies {
                response.cookie(build_cookie(spec));
            }
            response.finish()
        }
        Err(e) => handle_domain_error(e),
    }
}

/// Session user forwarded by the authenticating proxy, if any
fn authenticated_user(req: &HttpRequest) -> Option<Uuid> {
    req.headers()
        .get(AUTHENTICATED_USER_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Uuid::parse_str(value).ok())
}

/// Build an actix cookie from a cookie spec
///
/// All cookies are site-scoped with SameSite=Lax; lifetime is derived from
/// the grant's absolute expiry.
fn build_cookie(spec: &CookieSpec) -> Cookie<'static> {
    let max_age = (spec.expires_at - Utc::now().timestamp()).max(0);

    Cookie::build(spec.name.clone(), spec.value.clone())
        .path("/")
        .same_site(SameSite::Lax)
        .http_only(spec.http_only)
        .secure(spec.secure)
        .max_age(Duration::seconds(max_age))
        .finish()
}
