//! # Cache Module
//!
//! String key-value cache with per-key expiry, plus the typed JSON client the
//! repositories use.

pub mod client;
pub mod keys;
pub mod memory;
#[cfg(feature = "redis")]
pub mod redis_client;

use async_trait::async_trait;
use std::time::Duration;

use crate::error::Result;

pub use client::{CacheClient, CacheConfig, CacheTtl, SharedCacheClient, shared_cache};
pub use memory::MemoryCache;
#[cfg(feature = "redis")]
pub use redis_client::RedisCache;

/// Key-value store over strings with per-key expiry.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Value stored under `key`, `None` when absent or expired
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` and reset its expiry to `ttl`
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<()>;

    /// Delete `key`; absent keys are not an error
    async fn remove(&self, key: &str) -> Result<()>;

    /// Backend name for logs
    fn backend(&self) -> &'static str;
}
