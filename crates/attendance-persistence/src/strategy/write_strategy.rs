//! Write strategy implementations using enum dispatch.

use std::future::Future;

use crate::error::Result;

/// Write strategy enum - determines what happens to the cache after a write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteStrategy {
    /// Write to DB, then invalidate stale cache keys
    #[default]
    WriteInvalidate,
    /// Write to DB only, no cache interaction
    DbOnly,
}

/// Result of a committed write: the value to return and the cache keys that
/// may now hold a stale view of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOutcome<T> {
    pub value: T,
    pub stale_keys: Vec<String>,
}

impl<T> WriteOutcome<T> {
    pub fn new(value: T, mut stale_keys: Vec<String>) -> Self {
        stale_keys.sort();
        stale_keys.dedup();
        Self { value, stale_keys }
    }
}

impl WriteStrategy {
    /// Execute a write operation according to the strategy.
    ///
    /// - `db_fn`: Async function performing the write; resolves once committed
    /// - `invalidate_fn`: Async function removing the reported stale keys
    ///
    /// Invalidation only runs after `db_fn` succeeds, and its failure is
    /// logged without failing the write.
    pub async fn write<T, DbFut, InvalidateFut>(
        &self,
        db_fn: impl FnOnce() -> DbFut,
        invalidate_fn: impl FnOnce(Vec<String>) -> InvalidateFut,
    ) -> Result<T>
    where
        DbFut: Future<Output = Result<WriteOutcome<T>>>,
        InvalidateFut: Future<Output = Result<()>>,
    {
        let outcome = db_fn().await?;

        match self {
            Self::WriteInvalidate => {
                if let Err(e) = invalidate_fn(outcome.stale_keys).await {
                    tracing::warn!(error = %e, "Failed to invalidate cache");
                }
            }
            Self::DbOnly => {}
        }

        Ok(outcome.value)
    }
}
