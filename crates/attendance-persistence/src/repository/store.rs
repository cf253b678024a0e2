//! SQLite store: connection pool, transactions and embedded migrations.

use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, Transaction};
use std::str::FromStr;
use std::time::Duration;

use crate::error::Result;

// =============================================================================
// STORE CONFIGURATION
// =============================================================================

/// Relational store configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Connection string, e.g. `sqlite://attendance.db`
    pub url: String,
    pub max_connections: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://attendance.db".to_string(),
            max_connections: 5,
        }
    }
}

// =============================================================================
// STORE
// =============================================================================

/// Pooled SQLite store. Cloning shares the pool.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open the pool described by `config`, creating the database file if needed.
    ///
    /// Runs in WAL mode so readers never block behind the single writer.
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Private in-memory database with the schema applied.
    ///
    /// Held on a single connection that never idles out, since every
    /// connection to `:memory:` sees its own database.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Apply the embedded migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Write transaction holding the database write lock from its first
    /// statement.
    ///
    /// A deferred `BEGIN` that reads before writing cannot upgrade its lock
    /// while another connection writes, and SQLite fails it with `SQLITE_BUSY`
    /// without honouring the busy timeout. `BEGIN IMMEDIATE` waits instead.
    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>> {
        Ok(self.pool.begin_with("BEGIN IMMEDIATE").await?)
    }

    pub async fn acquire(&self) -> Result<PoolConnection<Sqlite>> {
        Ok(self.pool.acquire().await?)
    }

    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
