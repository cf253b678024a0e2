//! # API Configuration
//!
//! Environment-based configuration for the attendance API service.

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

use attendance_persistence::{CacheConfig, StoreConfig};
use thiserror::Error;

/// Configuration errors reported at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: '{value}'")]
    Invalid { name: &'static str, value: String },

    #[error("Unknown cache backend '{0}', expected 'redis' or 'memory'")]
    UnknownCacheBackend(String),
}

/// Cache backend selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CacheBackend {
    #[default]
    Redis,
    Memory,
}

impl FromStr for CacheBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(Self::Redis),
            "memory" | "in-memory" => Ok(Self::Memory),
            _ => Err(ConfigError::UnknownCacheBackend(s.to_string())),
        }
    }
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address
    pub server_addr: SocketAddr,

    /// Relational store configuration
    pub database: StoreConfig,

    /// Apply embedded migrations at startup
    pub run_migrations: bool,

    /// Cache configuration
    pub cache: CacheSettings,

    /// Logging level
    pub log_level: String,
}

/// Cache section of the configuration
#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub backend: CacheBackend,

    /// `false` bypasses the cache on every read and write
    pub enabled: bool,

    /// Redis connection (used by the `redis` backend)
    pub redis: CacheConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let redis = match lookup("REDIS_URL") {
            Some(url) => CacheConfig {
                url,
                ..CacheConfig::default()
            },
            None => {
                let host = var("REDIS_HOST", "127.0.0.1");
                let port = parse("REDIS_PORT", &var("REDIS_PORT", "6379"))?;
                CacheConfig::from_host_port(&host, port)
            }
        };

        Ok(Self {
            server_addr: parse("SERVER_ADDR", &var("SERVER_ADDR", "0.0.0.0:8080"))?,

            database: StoreConfig {
                url: var("DATABASE_URL", "sqlite://attendance.db"),
                max_connections: parse(
                    "DATABASE_MAX_CONNECTIONS",
                    &var("DATABASE_MAX_CONNECTIONS", "5"),
                )?,
            },

            run_migrations: parse_flag("RUN_MIGRATIONS", &var("RUN_MIGRATIONS", "true"))?,

            cache: CacheSettings {
                backend: var("CACHE_BACKEND", "redis").parse()?,
                enabled: parse_flag("CACHE_ENABLED", &var("CACHE_ENABLED", "true"))?,
                redis,
            },

            log_level: var("LOG_LEVEL", "info"),
        })
    }
}

fn parse<T: FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        value: value.to_string(),
    })
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            value: value.to_string(),
        }),
    }
}
