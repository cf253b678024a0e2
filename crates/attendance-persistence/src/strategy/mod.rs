//! # Strategy Module
//!
//! Enum-based cache/database access strategies.
//!
//! ## Read Strategies
//! - `CacheFirst` - Check cache, fall back to DB on miss and populate (default)
//! - `DbOnly` - Skip cache entirely
//!
//! ## Write Strategies
//! - `WriteInvalidate` - Commit to DB, then remove stale cache keys (default)
//! - `DbOnly` - Write DB only, no cache interaction
//!
//! ## Example
//!
//! ```rust,ignore
//! use attendance_persistence::strategy::ReadStrategy;
//!
//! let result = ReadStrategy::CacheFirst
//!     .read(
//!         || cache.get_json("class:1"),
//!         || db_lookup(1),
//!         Some(|class| cache.set_json("class:1", &class, ttl)),
//!     )
//!     .await?;
//! ```

pub mod read_strategy;
pub mod write_strategy;

pub use read_strategy::ReadStrategy;
pub use write_strategy::{WriteOutcome, WriteStrategy};

/// Strategy pair for a repository
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Strategies {
    pub read: ReadStrategy,
    pub write: WriteStrategy,
}

impl Strategies {
    /// Strategies for a deployment with or without the cache
    pub const fn for_cache(enabled: bool) -> Self {
        if enabled {
            Self {
                read: ReadStrategy::CacheFirst,
                write: WriteStrategy::WriteInvalidate,
            }
        } else {
            Self {
                read: ReadStrategy::DbOnly,
                write: WriteStrategy::DbOnly,
            }
        }
    }
}
