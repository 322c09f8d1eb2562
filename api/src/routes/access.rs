//! Admin issuance and revocation endpoints
//!
//! Both endpoints require the configured admin API key as a bearer token.
//! The key comparison is constant-time, and a missing or wrong key gets the
//! same generic permission error either way.

use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{TimeZone, Utc};
use url::Url;
use validator::Validate;

use crate::dto::{
    ErrorResponse, IssueAccessRequest, IssueAccessResponse, RevokeAccessRequest,
    RevokeAccessResponse,
};
use crate::handlers::error::handle_domain_error;
use crate::routes::AppState;

use qr_core::domain::entities::grant::{QUERY_MARKER, TOKEN_PARAM};
use qr_core::errors::DomainError;
use qr_core::repositories::{ProfileRepository, TokenStore};
use qr_core::services::CourseEnrollment;
use qr_shared::config::access::AccessConfig;

/// Handler for POST /api/v1/access/issue
///
/// Issues a signed, single-course access link. Body fields fall back to the
/// configured defaults; invalid input gets a specific 400.
pub async fn issue_access<S, E, P>(
    req: HttpRequest,
    state: web::Data<AppState<S, E, P>>,
    body: web::Json<IssueAccessRequest>,
) -> HttpResponse
where
    S: TokenStore + 'static,
    E: CourseEnrollment + 'static,
    P: ProfileRepository + 'static,
{
    if let Err(e) = require_admin(&req, &state.access_config) {
        return handle_domain_error(e);
    }

    if let Err(validation_errors) = body.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse::new(
            "validation_error",
            validation_errors.to_string(),
        ));
    }

    let course_id = body.course_id.unwrap_or(state.access_config.default_course_id);
    let redirect = body
        .redirect
        .clone()
        .unwrap_or_else(|| state.access_config.default_redirect_url.clone());
    let ttl = body.ttl.unwrap_or(state.access_config.default_ttl_seconds);

    let issued = match state.token_service.issue(course_id, &redirect, ttl).await {
        Ok(issued) => issued,
        Err(e) => return handle_domain_error(e),
    };

    let link = match entry_link(&state.server_config.public_url, &issued.token) {
        Ok(link) => link,
        Err(e) => return handle_domain_error(e),
    };

    HttpResponse::Ok().json(IssueAccessResponse {
        link,
        expires: Utc
            .timestamp_opt(issued.grant.expires_at, 0)
            .single()
            .unwrap_or_else(Utc::now),
        payload: issued.grant,
    })
}

/// Handler for POST /api/v1/access/revoke
///
/// Deletes the store entry for a token; the signature stays valid but the
/// token stops validating immediately.
pub async fn revoke_access<S, E, P>(
    req: HttpRequest,
    state: web::Data<AppState<S, E, P>>,
    body: web::Json<RevokeAccessRequest>,
) -> HttpResponse
where
    S: TokenStore + 'static,
    E: CourseEnrollment + 'static,
    P: ProfileRepository + 'static,
{
    if let Err(e) = require_admin(&req, &state.access_config) {
        return handle_domain_error(e);
    }

    match state.token_service.revoke(&body.token).await {
        Ok(revoked) => HttpResponse::Ok().json(RevokeAccessResponse { revoked }),
        Err(e) => handle_domain_error(e),
    }
}

/// Build the shareable entry link for a token
fn entry_link(public_url: &str, token: &str) -> Result<String, DomainError> {
    let url = Url::parse_with_params(public_url, &[(QUERY_MARKER, "1"), (TOKEN_PARAM, token)])
        .map_err(|e| DomainError::Internal {
            message: format!("Invalid public URL in configuration: {}", e),
        })?;
    Ok(url.into())
}

/// Check the admin bearer key in constant time
///
/// An unconfigured key disables issuance entirely rather than leaving it
/// open.
fn require_admin(req: &HttpRequest, config: &AccessConfig) -> Result<(), DomainError> {
    if config.admin_api_key.is_empty() {
        return Err(DomainError::PermissionDenied);
    }

    let presented = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(DomainError::PermissionDenied)?;

    if constant_time_eq::constant_time_eq(presented.as_bytes(), config.admin_api_key.as_bytes()) {
        Ok(())
    } else {
        Err(DomainError::PermissionDenied)
    }
}
