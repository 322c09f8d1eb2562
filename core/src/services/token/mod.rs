//! Token service module for the signed access-token lifecycle
//!
//! This module handles all token-related operations:
//! - Signing grants into compact, URL-safe token strings
//! - Verifying token strings back into trusted grants
//! - Issuance (validate inputs, sign, cache with matching TTL)
//! - Two-step validation against both the signature and the store
//! - Administrative revocation via store deletion

mod codec;
mod config;
mod service;

#[cfg(test)]
mod tests;

pub use codec::TokenCodec;
pub use config::TokenServiceConfig;
pub use service::{AccessTokenService, IssuedAccess};
