//! Registration hook handling marketing consent
//!
//! The login/registration subsystem itself is external. This service only
//! covers the hook surface: validating the consent checkbox on submission
//! and persisting the answer onto the newly created profile.

use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::errors::{DomainError, ValidationError};
use crate::repositories::ProfileRepository;
use crate::services::entry::is_attribution_cookie;

/// Profile attribute recording the marketing-consent answer
pub const CONSENT_ATTRIBUTE: &str = "qr_marketing_consent";

/// Registration hook service
pub struct RegistrationService<P: ProfileRepository> {
    profiles: Arc<P>,
    /// When set, a registration without the consent box ticked is rejected
    require_consent: bool,
}

impl<P: ProfileRepository> RegistrationService<P> {
    pub fn new(profiles: Arc<P>, require_consent: bool) -> Self {
        Self {
            profiles,
            require_consent,
        }
    }

    /// Validates a registration form submission
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::ConsentRequired` when consent is mandatory
    /// and the box was not ticked. Unlike token failures this error is
    /// specific: the user can fix the form and resubmit.
    pub fn validate_submission(&self, consent_given: bool) -> Result<(), DomainError> {
        if self.require_consent && !consent_given {
            return Err(ValidationError::ConsentRequired.into());
        }
        Ok(())
    }

    /// Records the consent answer and captured attribution on a freshly
    /// created profile
    ///
    /// The consent answer is stored explicitly either way; "not asked" and
    /// "declined" must stay distinguishable from an absent attribute.
    pub async fn on_user_created(
        &self,
        user_id: Uuid,
        consent_given: bool,
        attribution_cookies: &[(String, String)],
    ) -> Result<(), DomainError> {
        let value = if consent_given { "1" } else { "0" };
        self.profiles
            .set_attribute(user_id, CONSENT_ATTRIBUTE, value)
            .await?;

        for (name, value) in attribution_cookies {
            if is_attribution_cookie(name) && !value.is_empty() {
                self.profiles.set_attribute(user_id, name, value).await?;
            }
        }

        info!(%user_id, consent = consent_given, "recorded marketing consent");
        Ok(())
    }
}
