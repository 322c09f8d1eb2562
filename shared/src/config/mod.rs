//! Configuration types for the QR Access server
//!
//! Each configuration struct provides a `Default` implementation suitable
//! for local development and a `from_env` constructor for deployments.

pub mod access;
pub mod cache;
pub mod database;
pub mod server;

pub use access::AccessConfig;
pub use cache::CacheConfig;
pub use database::DatabaseConfig;
pub use server::ServerConfig;
