//! Read strategy implementations using enum dispatch.

use std::future::Future;

use crate::error::Result;

/// Read strategy enum - determines cache/db access pattern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReadStrategy {
    /// Check cache first, fall back to DB on miss
    #[default]
    CacheFirst,
    /// Only read from database, skip cache
    DbOnly,
}

impl ReadStrategy {
    /// Execute a read operation according to the strategy.
    ///
    /// - `cache_fn`: Async function to read from cache
    /// - `db_fn`: Async function to read from database
    /// - `populate_fn`: Optional async function to populate cache after DB read
    ///
    /// Cache failures (unreachable backend, undecodable value) count as a
    /// miss. Only a `Some` DB result is written back.
    pub async fn read<T, CacheFut, DbFut, PopulateFut>(
        &self,
        cache_fn: impl FnOnce() -> CacheFut,
        db_fn: impl FnOnce() -> DbFut,
        populate_fn: Option<impl FnOnce(T) -> PopulateFut>,
    ) -> Result<Option<T>>
    where
        T: Clone,
        CacheFut: Future<Output = Result<Option<T>>>,
        DbFut: Future<Output = Result<Option<T>>>,
        PopulateFut: Future<Output = Result<()>>,
    {
        match self {
            Self::CacheFirst => {
                match cache_fn().await {
                    Ok(Some(value)) => {
                        tracing::debug!("Cache hit");
                        return Ok(Some(value));
                    }
                    Ok(None) => {
                        tracing::debug!("Cache miss, falling back to DB");
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Cache error, falling back to DB");
                    }
                }

                let result = db_fn().await?;

                if let (Some(value), Some(populate)) = (&result, populate_fn) {
                    if let Err(e) = populate(value.clone()).await {
                        tracing::warn!(error = %e, "Failed to populate cache");
                    }
                }

                Ok(result)
            }

            Self::DbOnly => db_fn().await,
        }
    }

    /// Simple read without cache population.
    pub async fn read_simple<T, CacheFut, DbFut>(
        &self,
        cache_fn: impl FnOnce() -> CacheFut,
        db_fn: impl FnOnce() -> DbFut,
    ) -> Result<Option<T>>
    where
        T: Clone,
        CacheFut: Future<Output = Result<Option<T>>>,
        DbFut: Future<Output = Result<Option<T>>>,
    {
        self.read::<T, _, _, std::future::Ready<Result<()>>>(
            cache_fn,
            db_fn,
            None::<fn(T) -> std::future::Ready<Result<()>>>,
        )
        .await
    }
}
