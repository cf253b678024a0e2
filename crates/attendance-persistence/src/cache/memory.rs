//! In-process cache backend.
//!
//! Entries expire on the tokio clock, so tests can drive expiry with
//! `tokio::time::pause` and `advance`.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::CacheStore;
use crate::error::Result;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

/// `DashMap`-backed cache with lazy expiry on read
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    entries: Arc<DashMap<String, Entry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every expired entry, returning how many went
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        before.saturating_sub(self.entries.len())
    }

    /// Purge expired entries every `every` on a background task.
    ///
    /// Lazy expiry only reclaims keys that are read again.
    pub fn spawn_purger(&self, every: Duration) -> JoinHandle<()> {
        let cache = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                let purged = cache.purge_expired();
                if purged > 0 {
                    tracing::debug!(purged, "Purged expired cache entries");
                }
            }
        })
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let now = Instant::now();
        let expired = match self.entries.get(key) {
            Some(entry) if entry.expires_at > now => return Ok(Some(entry.value.clone())),
            Some(_) => true,
            None => false,
        };

        if expired {
            self.entries
                .remove_if(key, |_, entry| entry.expires_at <= Instant::now());
            tracing::trace!(key, "Expired cache entry dropped");
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<()> {
        let entry = Entry {
            value,
            expires_at: Instant::now() + ttl,
        };
        self.entries.insert(key.to_string(), entry);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
