//! Persistence layer error types

use attendance_domain::PatchError;
use thiserror::Error;

/// Persistence layer errors
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("{0}")]
    Database(String),

    #[error("Redis error: {0}")]
    Redis(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Entity not found: {entity_type} with key {key}")]
    NotFound {
        entity_type: &'static str,
        key: String,
    },

    #[error(transparent)]
    Patch(#[from] PatchError),
}

impl PersistenceError {
    pub fn not_found(entity_type: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            key: key.to_string(),
        }
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<sqlx::Error> for PersistenceError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db) => Self::Database(db.message().to_string()),
            other => Self::Database(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for PersistenceError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        Self::Migration(err.to_string())
    }
}

#[cfg(feature = "redis")]
impl From<redis::RedisError> for PersistenceError {
    fn from(err: redis::RedisError) -> Self {
        Self::Redis(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PersistenceError>;
