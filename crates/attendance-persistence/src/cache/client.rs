//! Typed cache client.
//!
//! Serializes entities and collections to JSON text on top of any
//! [`CacheStore`] backend.

use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;
use std::time::Duration;

use super::{CacheStore, MemoryCache};
use crate::error::Result;

/// Cache TTL configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtl {
    pub entity: Duration,
    pub collection: Duration,
}

impl Default for CacheTtl {
    fn default() -> Self {
        Self {
            entity: Duration::from_secs(60),
            collection: Duration::from_secs(60),
        }
    }
}

/// Redis cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub url: String,
    pub ttl: CacheTtl,
}

impl CacheConfig {
    pub fn from_host_port(host: &str, port: u16) -> Self {
        Self {
            url: format!("redis://{host}:{port}"),
            ..Default::default()
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            ttl: CacheTtl::default(),
        }
    }
}

/// JSON cache client over a shared backend
#[derive(Clone)]
pub struct CacheClient {
    store: Arc<dyn CacheStore>,
    ttl: CacheTtl,
}

impl CacheClient {
    pub fn new(store: impl CacheStore + 'static, ttl: CacheTtl) -> Self {
        Self {
            store: Arc::new(store),
            ttl,
        }
    }

    /// Client over a fresh in-process store with the default TTLs
    pub fn in_memory() -> Self {
        Self::new(MemoryCache::new(), CacheTtl::default())
    }

    /// Connect to Redis
    #[cfg(feature = "redis")]
    pub async fn redis(config: CacheConfig) -> Result<Self> {
        let store = super::RedisCache::connect(&config).await?;
        Ok(Self::new(store, config.ttl))
    }

    pub const fn ttl(&self) -> CacheTtl {
        self.ttl
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    /// Get a JSON value from cache
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.store.get(key).await? {
            Some(json) => {
                let parsed = serde_json::from_str(&json)?;
                Ok(Some(parsed))
            }
            None => Ok(None),
        }
    }

    /// Set a JSON value in cache with TTL
    pub async fn set_json<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.store.set(key, json, ttl).await
    }

    /// Store raw text, bypassing serialization
    pub async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        self.store.set(key, value.to_string(), ttl).await
    }

    /// Delete a key from cache
    pub async fn remove(&self, key: &str) -> Result<()> {
        self.store.remove(key).await
    }

    /// Delete every key, attempting all of them; reports the first failure
    pub async fn remove_many(&self, keys: &[String]) -> Result<()> {
        let mut first_error = None;
        for key in keys {
            if let Err(e) = self.store.remove(key).await {
                tracing::warn!(key = %key, error = %e, "Failed to remove cache key");
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

/// Shared cache client wrapper
pub type SharedCacheClient = Arc<CacheClient>;

/// Create a shared cache client
pub fn shared_cache(client: CacheClient) -> SharedCacheClient {
    Arc::new(client)
}
