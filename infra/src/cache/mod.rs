//! Cache module for Redis-based storage
//!
//! This module provides the Redis client with retry logic and the
//! Redis-backed implementation of the token store port.

pub mod redis_client;
pub mod token_cache;

#[cfg(test)]
mod tests;

pub use redis_client::RedisClient;
pub use token_cache::RedisTokenStore;

// Re-export commonly used types
pub use qr_shared::config::cache::CacheConfig;
