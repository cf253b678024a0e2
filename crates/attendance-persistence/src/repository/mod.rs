//! # Repository Module
//!
//! Store access per entity and the cached repository that applies the
//! read/write strategies on top of it.

pub mod attendances;
pub mod cached;
pub mod classes;
pub mod store;
pub mod students;
pub mod traits;

pub use cached::CachedRepository;
pub use store::{SqliteStore, StoreConfig};
pub use traits::StoredEntity;
