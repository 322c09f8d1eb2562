//! # QR Access API
//!
//! HTTP layer for the QR access backend: the public entry route, the admin
//! issuance endpoints, and the hook endpoints the external login and
//! registration subsystems call.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
