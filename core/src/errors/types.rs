//! Error type definitions for token validation and issuance input checks
//!
//! Token failures carry distinct variants for logging and tests only: the
//! presentation layer collapses every [`TokenError`] into one generic
//! "invalid or expired link" response so the wire never learns which check
//! failed. Validation errors, by contrast, are reported to the admin caller
//! with their specific message.

use thiserror::Error;

/// Token validation failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Malformed token")]
    Malformed,

    #[error("Token signature verification failed")]
    InvalidSignature,

    #[error("Token expired")]
    Expired,

    #[error("Token not present in store")]
    NotInStore,

    #[error("Token does not match its stored grant")]
    StoreMismatch,
}

/// Issuance and registration input validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid course id: {course_id}")]
    InvalidCourseId { course_id: u32 },

    #[error("Invalid redirect URL: {url}")]
    InvalidRedirectUrl { url: String },

    #[error("Marketing consent is required")]
    ConsentRequired,
}
