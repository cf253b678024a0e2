//! # Repository Traits
//!
//! Store access for each entity, expressed against a borrowed SQLite
//! connection so the same queries run inside or outside a transaction.

use async_trait::async_trait;
use attendance_domain::Patchable;
use serde::{Serialize, de::DeserializeOwned};
use sqlx::SqliteConnection;
use std::fmt::Debug;

use crate::error::Result;

/// An entity persisted in the store and cached under per-entity and
/// collection keys.
#[async_trait]
pub trait StoredEntity:
    Patchable + Serialize + DeserializeOwned + Clone + Debug + Send + Sync
{
    /// Create / full-update payload
    type Draft: Debug + Send + Sync;

    /// Cache key of the whole collection
    const COLLECTION_KEY: &'static str;

    fn id(&self) -> i64;

    /// Cache key of a single entity by identifier
    fn item_key(id: i64) -> String;

    /// Every per-entity key that may hold this entity
    fn cache_keys(&self) -> Vec<String> {
        vec![Self::item_key(self.id())]
    }

    /// Overwrite the mutable fields with a full-update payload
    fn replace_with(&mut self, draft: Self::Draft);

    async fn fetch_all(conn: &mut SqliteConnection) -> Result<Vec<Self>>;

    async fn fetch_by_id(conn: &mut SqliteConnection, id: i64) -> Result<Option<Self>>;

    /// Existing row matching the draft's natural key
    async fn find_duplicate(conn: &mut SqliteConnection, draft: &Self::Draft)
    -> Result<Option<Self>>;

    async fn insert(conn: &mut SqliteConnection, draft: &Self::Draft) -> Result<Self>;

    /// Write every mutable column of `entity`
    async fn save(conn: &mut SqliteConnection, entity: &Self) -> Result<()>;

    /// Delete the row; returns cache keys of dependent rows removed with it
    async fn delete(conn: &mut SqliteConnection, entity: &Self) -> Result<Vec<String>>;
}
