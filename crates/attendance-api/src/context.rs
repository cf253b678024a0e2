//! # API Context
//!
//! Application state and dependency injection for the HTTP handlers.

use std::sync::Arc;

use attendance_domain::{Attendance, Class, Student};
use attendance_persistence::{
    CacheClient, CachedRepository, PersistenceError, SharedCacheClient, SqliteStore, Strategies,
    shared_cache,
};

/// Application context shared across all handlers
#[derive(Clone)]
pub struct ApiContext {
    /// Student repository
    pub students: Arc<CachedRepository<Student>>,

    /// Class repository
    pub classes: Arc<CachedRepository<Class>>,

    /// Attendance repository
    pub attendances: Arc<CachedRepository<Attendance>>,

    /// Relational store
    pub store: SqliteStore,

    /// Cache client
    pub cache: SharedCacheClient,
}

impl ApiContext {
    /// Create a new API context over real dependencies
    pub fn new(store: SqliteStore, cache: SharedCacheClient, strategies: Strategies) -> Self {
        Self {
            students: Arc::new(CachedRepository::with_strategies(
                store.clone(),
                cache.clone(),
                strategies,
            )),
            classes: Arc::new(CachedRepository::with_strategies(
                store.clone(),
                cache.clone(),
                strategies,
            )),
            attendances: Arc::new(CachedRepository::with_strategies(
                store.clone(),
                cache.clone(),
                strategies,
            )),
            store,
            cache,
        }
    }

    /// Context over an in-memory store and cache
    pub async fn in_memory() -> Result<Self, PersistenceError> {
        let store = SqliteStore::in_memory().await?;
        Ok(Self::new(
            store,
            shared_cache(CacheClient::in_memory()),
            Strategies::default(),
        ))
    }
}

/// Builder for `ApiContext`
pub struct ApiContextBuilder {
    store: Option<SqliteStore>,
    cache: Option<CacheClient>,
    strategies: Strategies,
}

impl ApiContextBuilder {
    pub fn new() -> Self {
        Self {
            store: None,
            cache: None,
            strategies: Strategies::default(),
        }
    }

    #[must_use]
    pub fn with_store(mut self, store: SqliteStore) -> Self {
        self.store = Some(store);
        self
    }

    #[must_use]
    pub fn with_cache(mut self, cache: CacheClient) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Turn caching on or off for every repository
    #[must_use]
    pub fn with_cache_enabled(mut self, enabled: bool) -> Self {
        self.strategies = Strategies::for_cache(enabled);
        self
    }

    pub fn build(self) -> Result<ApiContext, &'static str> {
        let store = self.store.ok_or("Relational store required")?;
        let cache = self.cache.ok_or("Cache client required")?;
        Ok(ApiContext::new(store, shared_cache(cache), self.strategies))
    }
}

impl Default for ApiContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
