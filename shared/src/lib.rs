//! Shared utilities and common types for the QR Access server
//!
//! This crate provides functionality used across all server modules:
//! - Configuration types with environment-variable loading
//! - The common error response structure

pub mod config;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{AccessConfig, CacheConfig, DatabaseConfig, ServerConfig};
pub use types::response::ErrorResponse;
