//! Registration hooks
//!
//! Called by the registration subsystem to validate the marketing-consent
//! checkbox and, after the account exists, to persist the consent answer
//! and any captured attribution.

use actix_web::{web, HttpRequest, HttpResponse};

use crate::dto::{UserCreatedRequest, ValidateRegistrationRequest};
use crate::handlers::error::handle_domain_error;
use crate::routes::AppState;

use qr_core::repositories::{ProfileRepository, TokenStore};
use qr_core::services::entry::is_attribution_cookie;
use qr_core::services::CourseEnrollment;

/// Handler for POST /api/v1/hooks/registration/validate
pub async fn validate_registration<S, E, P>(
    state: web::Data<AppState<S, E, P>>,
    body: web::Json<ValidateRegistrationRequest>,
) -> HttpResponse
where
    S: TokenStore + 'static,
    E: CourseEnrollment + 'static,
    P: ProfileRepository + 'static,
{
    match state
        .registration_service
        .validate_submission(body.consent_given)
    {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => handle_domain_error(e),
    }
}

/// Handler for POST /api/v1/hooks/registration/created
pub async fn user_created<S, E, P>(
    req: HttpRequest,
    state: web::Data<AppState<S, E, P>>,
    body: web::Json<UserCreatedRequest>,
) -> HttpResponse
where
    S: TokenStore + 'static,
    E: CourseEnrollment + 'static,
    P: ProfileRepository + 'static,
{
    let attribution: Vec<(String, String)> = req
        .cookies()
        .map(|cookies| {
            cookies
                .iter()
                .filter(|c| is_attribution_cookie(c.name()))
                .map(|c| (c.name().to_string(), c.value().to_string()))
                .collect()
        })
        .unwrap_or_default();

    match state
        .registration_service
        .on_user_created(body.user_id, body.consent_given, &attribution)
        .await
    {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => handle_domain_error(e),
    }
}
