//! # Redis Cache Backend
//!
//! Redis client wrapper implementing [`CacheStore`] with plain string values.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use std::time::Duration;

use super::{CacheConfig, CacheStore};
use crate::error::Result;

/// Redis cache over a reconnecting multiplexed connection
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
}

impl RedisCache {
    /// Connect to the configured Redis server
    pub async fn connect(config: &CacheConfig) -> Result<Self> {
        let client = Client::open(config.url.as_str())?;
        let conn = ConnectionManager::new(client).await?;

        Ok(Self { conn })
    }
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<()> {
        let mut conn = self.conn.clone();
        // EX 0 is rejected by Redis
        let seconds = ttl.as_secs().max(1);
        let _: () = conn.set_ex(key, value, seconds).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: i64 = conn.del(key).await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
