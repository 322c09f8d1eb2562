//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the QR Access backend.
//! It provides concrete implementations for the ports defined in `qr_core`:
//!
//! - **Cache**: Redis-backed token store with TTL eviction
//! - **Database**: MySQL profile attribute storage using SQLx
//! - **Enrollment**: HTTP client for the external course backend
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)
//! - `redis-cache`: Enable the Redis token store (default)

use qr_core::errors::DomainError;

/// Cache module - Redis client and the token store implementation
#[cfg(feature = "redis-cache")]
pub mod cache;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Enrollment module - HTTP client for the course backend
pub mod enrollment;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(error: InfrastructureError) -> Self {
        DomainError::Internal {
            message: error.to_string(),
        }
    }
}
