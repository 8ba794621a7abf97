// ABOUTME: Cache abstraction layer for weather condition caching
// ABOUTME: Pluggable backend support (in-memory, Redis) selected by the factory
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Cache factory for creating cache providers
pub mod factory;
/// In-memory cache implementation
pub mod memory;
/// Redis cache implementation
pub mod redis;

use crate::config::environment::{parse_env, RedisConnectionConfig};
use crate::constants::cache::{DEFAULT_CACHE_MAX_ENTRIES, DEFAULT_CLEANUP_INTERVAL_SECS};
use crate::errors::AppResult;
use std::env;
use std::time::Duration;

/// Cache provider trait for pluggable backend implementations
///
/// Keys and values are plain strings so that the Redis layout stays readable
/// by other processes sharing the keyspace. Every `set` is a single backend
/// operation, so a reader never observes a value without its expiry.
///
/// # Examples
///
/// ```rust,no_run
/// use fairweather_server::cache::{CacheConfig, CacheProvider};
/// use fairweather_server::cache::memory::InMemoryCache;
/// use std::time::Duration;
/// # async fn example() -> Result<(), fairweather_server::errors::AppError> {
///
/// let config = CacheConfig {
///     enable_background_cleanup: false,
///     ..Default::default()
/// };
/// let cache = InMemoryCache::new(config).await?;
///
/// cache.set("Craigavon", "Clear", Duration::from_secs(600)).await?;
/// assert_eq!(cache.get("Craigavon").await?.as_deref(), Some("Clear"));
/// # Ok(())
/// # }
/// ```
#[async_trait::async_trait]
pub trait CacheProvider: Send + Sync + Clone {
    /// Create new cache instance with configuration
    ///
    /// # Errors
    ///
    /// Returns an error if cache initialization fails
    async fn new(config: CacheConfig) -> AppResult<Self>
    where
        Self: Sized;

    /// Store value in cache with TTL
    ///
    /// # Errors
    ///
    /// Returns an error if the backend write fails
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()>;

    /// Retrieve an unexpired value
    ///
    /// # Errors
    ///
    /// Returns an error if the backend read fails
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Remove single cache entry
    ///
    /// # Errors
    ///
    /// Returns an error if invalidation fails
    async fn invalidate(&self, key: &str) -> AppResult<()>;

    /// Check if key exists in cache
    ///
    /// # Errors
    ///
    /// Returns an error if existence check fails
    async fn exists(&self, key: &str) -> AppResult<bool>;

    /// Get remaining TTL for key
    ///
    /// # Errors
    ///
    /// Returns an error if TTL check fails
    async fn ttl(&self, key: &str) -> AppResult<Option<Duration>>;

    /// Verify cache backend is healthy
    ///
    /// # Errors
    ///
    /// Returns an error if health check fails
    async fn health_check(&self) -> AppResult<()>;
}

/// Cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries (for in-memory cache)
    pub max_entries: usize,
    /// Redis connection URL (for Redis cache)
    pub redis_url: Option<String>,
    /// Cleanup interval for expired entries
    pub cleanup_interval: Duration,
    /// Enable background cleanup task (should be false in tests to avoid runtime conflicts)
    pub enable_background_cleanup: bool,
    /// Redis connection and retry configuration
    pub redis_connection: RedisConnectionConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_CACHE_MAX_ENTRIES,
            redis_url: None,
            cleanup_interval: Duration::from_secs(DEFAULT_CLEANUP_INTERVAL_SECS),
            enable_background_cleanup: true,
            redis_connection: RedisConnectionConfig::default(),
        }
    }
}

impl CacheConfig {
    /// Load cache configuration from environment
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to an unparseable value
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            max_entries: parse_env("CACHE_MAX_ENTRIES", DEFAULT_CACHE_MAX_ENTRIES)?,
            redis_url: env::var("REDIS_URL").ok().filter(|url| !url.is_empty()),
            cleanup_interval: Duration::from_secs(parse_env(
                "CACHE_CLEANUP_INTERVAL_SECS",
                DEFAULT_CLEANUP_INTERVAL_SECS,
            )?),
            enable_background_cleanup: true,
            redis_connection: RedisConnectionConfig::from_env()?,
        })
    }
}
