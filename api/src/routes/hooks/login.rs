//! Post-login hook
//!
//! Called by the login subsystem after a successful login. Redeems the
//! continuation cookie: enrolls the user, persists attribution, answers
//! with the redirect target, and clears the QR cookies so the token cannot
//! ride along on a future login.

use actix_web::cookie::Cookie;
use actix_web::{web, HttpRequest, HttpResponse};

use crate::dto::{LoginRedirectResponse, LoginSucceededRequest};
use crate::handlers::error::handle_domain_error;
use crate::routes::AppState;

use qr_core::repositories::{ProfileRepository, TokenStore};
use qr_core::services::entry::{is_attribution_cookie, ACCESS_COOKIE};
use qr_core::services::CourseEnrollment;

/// Handler for POST /api/v1/hooks/login
///
/// A missing, expired, or revoked cookie token is not an error: the
/// response still carries a redirect target (the caller's requested one or
/// the configured default) and a 200. Enrollment simply doesn't happen.
pub async fn login_succeeded<S, E, P>(
    req: HttpRequest,
    state: web::Data<AppState<S, E, P>>,
    body: web::Json<LoginSucceededRequest>,
) -> HttpResponse
where
    S: TokenStore + 'static,
    E: CourseEnrollment + 'static,
    P: ProfileRepository + 'static,
{
    let cookie_token = req.cookie(ACCESS_COOKIE).map(|c| c.value().to_string());
    let attribution = attribution_cookies(&req);

    let grant = match state
        .entry_service
        .on_login_succeeded(body.user_id, cookie_token.as_deref(), &attribution)
        .await
    {
        Ok(grant) => grant,
        Err(e) => return handle_domain_error(e),
    };

    let default_redirect = body
        .requested_redirect
        .clone()
        .unwrap_or_else(|| state.access_config.default_redirect_url.clone());

    let resolution = state.entry_service.resolve_login_redirect(
        cookie_token.is_some(),
        grant.as_ref(),
        &default_redirect,
    );

    let mut response = HttpResponse::Ok();
    if resolution.clear_cookie {
        response.cookie(removal_cookie(ACCESS_COOKIE));
        for (name, _) in &attribution {
            response.cookie(removal_cookie(name));
        }
    }

    response.json(LoginRedirectResponse {
        redirect_to: resolution.location,
    })
}

/// Attribution cookies present on the request
fn attribution_cookies(req: &HttpRequest) -> Vec<(String, String)> {
    req.cookies()
        .map(|cookies| {
            cookies
                .iter()
                .filter(|c| is_attribution_cookie(c.name()))
                .map(|c| (c.name().to_string(), c.value().to_string()))
                .collect()
        })
        .unwrap_or_default()
}

/// Cookie that instructs the browser to drop the named cookie
fn removal_cookie(name: &str) -> Cookie<'static> {
    let mut cookie = Cookie::build(name.to_string(), "").path("/").finish();
    cookie.make_removal();
    cookie
}
