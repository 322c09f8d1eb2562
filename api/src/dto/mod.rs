//! Data transfer objects for the HTTP API

pub mod access;

pub use access::{
    IssueAccessRequest, IssueAccessResponse, LoginSucceededRequest, LoginRedirectResponse,
    RevokeAccessRequest, RevokeAccessResponse, UserCreatedRequest, ValidateRegistrationRequest,
};

// Re-export the shared error envelope
pub use qr_shared::types::response::ErrorResponse;
