//! Entry handler service implementation

use std::sync::Arc;
use tracing::{debug, info};
use url::Url;
use uuid::Uuid;

use crate::domain::entities::grant::{AccessGrant, QUERY_MARKER, TOKEN_PARAM};
use crate::errors::DomainError;
use crate::repositories::{ProfileRepository, TokenStore};
use crate::services::enrollment::CourseEnrollment;
use crate::services::token::AccessTokenService;

/// Name of the httpOnly continuation cookie holding the raw token
pub const ACCESS_COOKIE: &str = "qr_access_token";

/// Campaign-attribution query parameters carried through the redirect chain
pub const ATTRIBUTION_KEYS: [&str; 3] = ["utm_source", "utm_medium", "utm_campaign"];

/// Prefix namespacing attribution cookies
const ATTRIBUTION_COOKIE_PREFIX: &str = "qr_";

/// Cookie name for an attribution key (`utm_source` -> `qr_utm_source`)
pub fn attribution_cookie_name(key: &str) -> String {
    format!("{}{}", ATTRIBUTION_COOKIE_PREFIX, key)
}

/// Whether a cookie name is one of the namespaced attribution cookies
pub fn is_attribution_cookie(name: &str) -> bool {
    name.strip_prefix(ATTRIBUTION_COOKIE_PREFIX)
        .map(|key| ATTRIBUTION_KEYS.contains(&key))
        .unwrap_or(false)
}

/// Cookie to set on the entry response
///
/// All cookies are scoped to the site and SameSite=Lax; the presentation
/// layer applies those attributes uniformly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieSpec {
    pub name: String,
    pub value: String,
    /// Absolute expiry (seconds since epoch), equal to the grant's expiry
    pub expires_at: i64,
    /// The continuation cookie is httpOnly; attribution cookies are not
    pub http_only: bool,
    /// Set when the inbound transport was encrypted
    pub secure: bool,
}

/// Explicit snapshot of the inbound entry request
///
/// Query parameters, cookies and session are modeled as inputs rather than
/// read from ambient request state.
#[derive(Debug, Clone)]
pub struct EntryRequest {
    /// Token string from the `t` query parameter
    pub token: String,
    /// Raw attribution query parameters, unfiltered
    pub attribution: Vec<(String, String)>,
    /// Present when the requester already has an active session
    pub authenticated_user: Option<Uuid>,
    /// Whether the request arrived over an encrypted transport
    pub secure_transport: bool,
}

/// Outcome of a successful entry: where to send the user and what to set
#[derive(Debug, Clone)]
pub struct EntryOutcome {
    /// Redirect target: the grant's URL (authenticated) or the login entry
    pub location: String,
    /// Continuation cookie plus any attribution cookies
    pub cookies: Vec<CookieSpec>,
}

/// Outcome of the post-login redirect-target resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectResolution {
    /// Final redirect target
    pub location: String,
    /// Whether the continuation cookie must be cleared
    pub clear_cookie: bool,
}

/// Configuration for the entry handler
#[derive(Debug, Clone)]
pub struct EntryConfig {
    /// Public base URL of this service (the QR links point here)
    pub public_url: String,
    /// Entry point of the external login/registration subsystem
    pub login_url: String,
}

/// Entry handler driving the token lifecycle across the login gap
///
/// States: a presented token either gets rejected outright, or produces the
/// continuation cookie and a redirect (straight to the target for an
/// authenticated requester, to the login subsystem otherwise). After login
/// the token is re-validated from the cookie: a valid one enrolls the user
/// and overrides the redirect target, an invalid one falls through silently.
pub struct EntryService<S, E, P>
where
    S: TokenStore,
    E: CourseEnrollment,
    P: ProfileRepository,
{
    tokens: Arc<AccessTokenService<S>>,
    enrollment: Arc<E>,
    profiles: Arc<P>,
    config: EntryConfig,
}

impl<S, E, P> EntryService<S, E, P>
where
    S: TokenStore,
    E: CourseEnrollment,
    P: ProfileRepository,
{
    /// Creates a new entry handler
    pub fn new(
        tokens: Arc<AccessTokenService<S>>,
        enrollment: Arc<E>,
        profiles: Arc<P>,
        config: EntryConfig,
    ) -> Self {
        Self {
            tokens,
            enrollment,
            profiles,
            config,
        }
    }

    /// Handles an inbound QR entry request
    ///
    /// Runs the two-step token validation, then either enrolls and forwards
    /// an already-authenticated requester, or parks the token in the
    /// continuation cookie and redirects to the login subsystem with the
    /// original entry link attached so an abandoned flow can restart.
    ///
    /// # Returns
    ///
    /// * `Ok(EntryOutcome)` - Redirect target plus cookies to set
    /// * `Err(DomainError::Token)` - Rejected; surface as a generic denial
    ///   with no cookies
    pub async fn handle_entry(&self, request: EntryRequest) -> Result<EntryOutcome, DomainError> {
        let grant = self.tokens.validate(&request.token).await?;

        let mut cookies = vec![CookieSpec {
            name: ACCESS_COOKIE.to_string(),
            value: request.token.clone(),
            expires_at: grant.expires_at,
            http_only: true,
            secure: request.secure_transport,
        }];
        for (key, value) in &request.attribution {
            if ATTRIBUTION_KEYS.contains(&key.as_str()) && !value.is_empty() {
                cookies.push(CookieSpec {
                    name: attribution_cookie_name(key),
                    value: value.clone(),
                    expires_at: grant.expires_at,
                    http_only: false,
                    secure: request.secure_transport,
                });
            }
        }

        if let Some(user_id) = request.authenticated_user {
            // Active session: skip the login leg entirely
            self.enrollment.grant_access(user_id, grant.course_id).await;
            info!(%user_id, course_id = grant.course_id, "entry with active session, enrolled and forwarding");
            return Ok(EntryOutcome {
                location: grant.redirect_url,
                cookies,
            });
        }

        let location = self.login_redirect_url(&request.token)?;
        Ok(EntryOutcome { location, cookies })
    }

    /// Handles the login subsystem's "user logged in" event
    ///
    /// Reads the token from the continuation cookie, not the URL. A missing
    /// or invalid token is a silent no-op (`Ok(None)`): an expired QR link
    /// after a slow registration flow is an expected case, and the default
    /// post-login behavior must not be disturbed. A valid token persists the
    /// captured attribution cookies onto the user's profile and enrolls the
    /// user.
    pub async fn on_login_succeeded(
        &self,
        user_id: Uuid,
        cookie_token: Option<&str>,
        attribution_cookies: &[(String, String)],
    ) -> Result<Option<AccessGrant>, DomainError> {
        let Some(token) = cookie_token else {
            return Ok(None);
        };

        let grant = match self.tokens.validate(token).await {
            Ok(grant) => grant,
            Err(DomainError::Token(e)) => {
                debug!(error = %e, %user_id, "post-login token rejected, skipping enrollment");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        for (name, value) in attribution_cookies {
            if is_attribution_cookie(name) && !value.is_empty() {
                self.profiles.set_attribute(user_id, name, value).await?;
            }
        }

        self.enrollment.grant_access(user_id, grant.course_id).await;
        info!(%user_id, course_id = grant.course_id, "post-login enrollment completed");

        Ok(Some(grant))
    }

    /// Resolves the post-login redirect target
    ///
    /// Works from the grant [`Self::on_login_succeeded`] already redeemed,
    /// so the token is validated exactly once per login and the redirect
    /// can never disagree with the enrollment decision. A redeemed grant's
    /// redirect URL takes precedence over whatever target was otherwise
    /// requested. The continuation cookie is cleared whenever it was
    /// present, redeemed or not, so the token cannot ride along on a
    /// future unrelated login.
    pub fn resolve_login_redirect(
        &self,
        cookie_present: bool,
        grant: Option<&AccessGrant>,
        default_redirect: &str,
    ) -> RedirectResolution {
        let location = match grant {
            Some(grant) if !grant.redirect_url.is_empty() => grant.redirect_url.clone(),
            _ => default_redirect.to_string(),
        };

        RedirectResolution {
            location,
            clear_cookie: cookie_present,
        }
    }

    /// Login URL with the original entry link re-attached as `redirect_to`
    fn login_redirect_url(&self, token: &str) -> Result<String, DomainError> {
        let entry_url = Url::parse_with_params(
            &self.config.public_url,
            &[(QUERY_MARKER, "1"), (TOKEN_PARAM, token)],
        )
        .map_err(|e| DomainError::Internal {
            message: format!("Invalid public URL in configuration: {}", e),
        })?;

        let login_url =
            Url::parse_with_params(&self.config.login_url, &[("redirect_to", entry_url.as_str())])
                .map_err(|e| DomainError::Internal {
                    message: format!("Invalid login URL in configuration: {}", e),
                })?;

        Ok(login_url.into())
    }
}
