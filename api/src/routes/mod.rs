//! HTTP route handlers
//!
//! - `entry` - the public QR entry route
//! - `access` - admin issuance and revocation
//! - `hooks` - endpoints the external login/registration subsystems call

pub mod access;
pub mod entry;
pub mod hooks;

use std::sync::Arc;

use qr_core::repositories::{ProfileRepository, TokenStore};
use qr_core::services::{
    AccessTokenService, CourseEnrollment, EntryService, RegistrationService,
};
use qr_shared::config::access::AccessConfig;
use qr_shared::config::server::ServerConfig;

/// Application state that holds the shared services
pub struct AppState<S, E, P>
where
    S: TokenStore,
    E: CourseEnrollment,
    P: ProfileRepository,
{
    pub token_service: Arc<AccessTokenService<S>>,
    pub entry_service: Arc<EntryService<S, E, P>>,
    pub registration_service: Arc<RegistrationService<P>>,
    pub access_config: AccessConfig,
    pub server_config: ServerConfig,
}
