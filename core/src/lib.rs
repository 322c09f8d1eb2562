//! # QR Access Core
//!
//! Core business logic and domain layer for the QR Access backend.
//! This crate contains the access grant entity, the signed token lifecycle
//! (codec, issuance, two-step validation), the entry-handler state machine,
//! repository interfaces, and error types that form the foundation of the
//! application architecture.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
