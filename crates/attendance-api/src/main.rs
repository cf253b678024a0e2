//! # Student Attendance API Server
//!
//! Binary entry point for the attendance REST service.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use attendance_api::{ApiContextBuilder, CacheBackend, Config, build_router};
use attendance_persistence::cache::MemoryCache;
use attendance_persistence::{CacheClient, CacheTtl, SqliteStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    tracing::info!(
        version = attendance_api::VERSION,
        "Starting Student Attendance API"
    );

    // Initialize the relational store
    tracing::info!(url = %config.database.url, "Connecting to database");
    let store = SqliteStore::connect(&config.database).await?;

    if config.run_migrations {
        store.migrate().await?;
        tracing::info!("Migrations applied");
    }

    // Initialize the cache
    let cache = connect_cache(&config).await?;
    tracing::info!(
        backend = cache.backend(),
        enabled = config.cache.enabled,
        "Cache ready"
    );

    // Build API context
    let api_ctx = ApiContextBuilder::new()
        .with_store(store)
        .with_cache(cache)
        .with_cache_enabled(config.cache.enabled)
        .build()
        .map_err(anyhow::Error::msg)?;

    // Build router
    let app = build_router(api_ctx);

    // Start server
    let addr = config.server_addr;
    tracing::info!(%addr, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

async fn connect_cache(config: &Config) -> anyhow::Result<CacheClient> {
    match config.cache.backend {
        CacheBackend::Memory => {
            let ttl = CacheTtl::default();
            let memory = MemoryCache::new();
            // Detached; runs until the process exits
            memory.spawn_purger(ttl.entity);
            Ok(CacheClient::new(memory, ttl))
        }
        #[cfg(feature = "redis")]
        CacheBackend::Redis => {
            tracing::info!(url = %config.cache.redis.url, "Connecting to Redis");
            Ok(CacheClient::redis(config.cache.redis.clone()).await?)
        }
        #[cfg(not(feature = "redis"))]
        CacheBackend::Redis => {
            anyhow::bail!("built without the `redis` feature; set CACHE_BACKEND=memory")
        }
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, shutting down");
        }
    }
}
