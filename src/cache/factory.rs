// ABOUTME: Cache factory for environment-based backend selection
// ABOUTME: Chooses Redis when a URL is configured, otherwise the in-memory LRU cache
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{memory::InMemoryCache, redis::RedisCache, CacheConfig, CacheProvider};
use crate::errors::AppResult;
use std::time::Duration;

#[derive(Clone)]
enum Backend {
    Memory(InMemoryCache),
    Redis(RedisCache),
}

/// Unified cache interface over the configured backend
#[derive(Clone)]
pub struct Cache {
    inner: Backend,
}

impl Cache {
    /// Create new cache instance based on configuration
    ///
    /// # Errors
    ///
    /// Returns an error if cache initialization fails
    pub async fn new(config: CacheConfig) -> AppResult<Self> {
        let inner = if config.redis_url.is_some() {
            tracing::info!("Initializing Redis cache");
            Backend::Redis(RedisCache::new(config).await?)
        } else {
            tracing::info!(
                "Initializing in-memory cache (max entries: {})",
                config.max_entries
            );
            Backend::Memory(InMemoryCache::new(config).await?)
        };
        Ok(Self { inner })
    }

    /// In-memory cache without background cleanup, for tests and tools
    ///
    /// # Errors
    ///
    /// Returns an error if cache initialization fails
    pub async fn in_memory(max_entries: usize) -> AppResult<Self> {
        Self::new(CacheConfig {
            max_entries,
            redis_url: None,
            enable_background_cleanup: false,
            ..CacheConfig::default()
        })
        .await
    }

    /// Name of the active backend
    #[must_use]
    pub const fn backend_name(&self) -> &'static str {
        match self.inner {
            Backend::Memory(_) => "memory",
            Backend::Redis(_) => "redis",
        }
    }

    /// Store value in cache with TTL
    ///
    /// # Errors
    ///
    /// Returns an error if the backend write fails
    pub async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        match &self.inner {
            Backend::Memory(cache) => cache.set(key, value, ttl).await,
            Backend::Redis(cache) => cache.set(key, value, ttl).await,
        }
    }

    /// Retrieve value from cache
    ///
    /// # Errors
    ///
    /// Returns an error if the backend read fails
    pub async fn get(&self, key: &str) -> AppResult<Option<String>> {
        match &self.inner {
            Backend::Memory(cache) => cache.get(key).await,
            Backend::Redis(cache) => cache.get(key).await,
        }
    }

    /// Remove single cache entry
    ///
    /// # Errors
    ///
    /// Returns an error if invalidation fails
    pub async fn invalidate(&self, key: &str) -> AppResult<()> {
        match &self.inner {
            Backend::Memory(cache) => cache.invalidate(key).await,
            Backend::Redis(cache) => cache.invalidate(key).await,
        }
    }

    /// Check if key exists in cache
    ///
    /// # Errors
    ///
    /// Returns an error if existence check fails
    pub async fn exists(&self, key: &str) -> AppResult<bool> {
        match &self.inner {
            Backend::Memory(cache) => cache.exists(key).await,
            Backend::Redis(cache) => cache.exists(key).await,
        }
    }

    /// Get remaining TTL for key
    ///
    /// # Errors
    ///
    /// Returns an error if TTL check fails
    pub async fn ttl(&self, key: &str) -> AppResult<Option<Duration>> {
        match &self.inner {
            Backend::Memory(cache) => cache.ttl(key).await,
            Backend::Redis(cache) => cache.ttl(key).await,
        }
    }

    /// Verify cache backend is healthy
    ///
    /// # Errors
    ///
    /// Returns an error if health check fails
    pub async fn health_check(&self) -> AppResult<()> {
        match &self.inner {
            Backend::Memory(cache) => cache.health_check().await,
            Backend::Redis(cache) => cache.health_check().await,
        }
    }
}
