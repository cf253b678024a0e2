//! # Attendance Persistence Library
//!
//! Persistence layer for the attendance service: a relational store as the
//! source of truth and a short-lived cache in front of it.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       HTTP Handlers                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Cached Repository Wrapper                   │
//! │      (read-through on get, invalidate after commit)          │
//! └─────────────────────────────────────────────────────────────┘
//!                    │                   │
//!                    ▼                   ▼
//! ┌─────────────────────────┐   ┌──────────────────────────────┐
//! │   Redis / In-Memory     │   │           SQLite             │
//! │   (60s TTL entries)     │   │     (Source of Truth)        │
//! └─────────────────────────┘   └──────────────────────────────┘
//! ```
//!
//! ## Features
//!
//! - `redis`: Enable the Redis cache backend (default)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use attendance_persistence::{
//!     CacheClient, CachedRepository, SqliteStore, StoreConfig, shared_cache,
//! };
//! use attendance_domain::{NewClass, Class};
//!
//! let store = SqliteStore::connect(&StoreConfig::default()).await?;
//! store.migrate().await?;
//! let cache = shared_cache(CacheClient::in_memory());
//!
//! let classes: CachedRepository<Class> = CachedRepository::new(store, cache);
//! let math = classes.create(NewClass { class_name: "Math101".into() }).await?;
//! let again = classes.get_by_id(math.class_id).await?; // served from cache
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod error;
pub mod repository;
pub mod strategy;

// Re-export commonly used types
pub use cache::{CacheClient, CacheConfig, CacheTtl, SharedCacheClient, shared_cache};
pub use error::{PersistenceError, Result};
pub use repository::{CachedRepository, SqliteStore, StoreConfig, StoredEntity};
pub use strategy::{ReadStrategy, Strategies, WriteOutcome, WriteStrategy};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
