//! Hook endpoints for the external login and registration subsystems
//!
//! These routes are the explicit contract the external subsystems call at
//! the points where control comes back to this service: after a successful
//! login, during registration validation, and after a user is created.

pub mod login;
pub mod registration;
