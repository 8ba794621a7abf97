// ABOUTME: Unit tests for in-memory cache implementation
// ABOUTME: Tests TTL expiration, capacity limits, invalidation and background cleanup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(missing_docs)]

use anyhow::Result;
use fairweather_server::cache::memory::InMemoryCache;
use fairweather_server::cache::{factory::Cache, CacheConfig, CacheProvider};
use std::time::Duration;

async fn create_test_cache(max_entries: usize, cleanup_interval_secs: u64) -> Result<Cache> {
    let config = CacheConfig {
        max_entries,
        redis_url: None,
        cleanup_interval: Duration::from_secs(cleanup_interval_secs),
        enable_background_cleanup: false,
        ..CacheConfig::default()
    };
    Ok(Cache::new(config).await?)
}

#[tokio::test]
async fn test_cache_set_and_get() -> Result<()> {
    let cache = create_test_cache(100, 300).await?;

    cache.set("Belfast", "Clouds", Duration::from_secs(10)).await?;

    assert_eq!(cache.get("Belfast").await?.as_deref(), Some("Clouds"));
    assert_eq!(cache.backend_name(), "memory");
    Ok(())
}

#[tokio::test]
async fn test_cache_miss_returns_none() -> Result<()> {
    let cache = create_test_cache(100, 300).await?;
    assert_eq!(cache.get("Nowhere").await?, None);
    assert!(!cache.exists("Nowhere").await?);
    Ok(())
}

#[tokio::test]
async fn test_cache_expiration() -> Result<()> {
    let cache = create_test_cache(100, 300).await?;

    cache.set("Armagh", "Rain", Duration::from_millis(100)).await?;
    assert!(cache.exists("Armagh").await?);

    tokio::time::sleep(Duration::from_millis(150)).await;

    assert_eq!(cache.get("Armagh").await?, None);
    Ok(())
}

#[tokio::test]
async fn test_cache_ttl() -> Result<()> {
    let cache = create_test_cache(100, 300).await?;

    cache.set("Omagh", "Mist", Duration::from_secs(10)).await?;

    let ttl = cache.ttl("Omagh").await?;
    assert!(ttl.is_some_and(|ttl| ttl <= Duration::from_secs(10) && ttl > Duration::from_secs(8)));
    assert_eq!(cache.ttl("Dublin").await?, None);
    Ok(())
}

#[tokio::test]
async fn test_overwrite_refreshes_value() -> Result<()> {
    let cache = create_test_cache(100, 300).await?;

    cache.set("Coleraine", "Rain", Duration::from_secs(60)).await?;
    cache.set("Coleraine", "Clear", Duration::from_secs(60)).await?;

    assert_eq!(cache.get("Coleraine").await?.as_deref(), Some("Clear"));
    Ok(())
}

#[tokio::test]
async fn test_cache_invalidate() -> Result<()> {
    let cache = create_test_cache(100, 300).await?;

    cache.set("Lisburn", "Rain", Duration::from_secs(60)).await?;
    cache.invalidate("Lisburn").await?;

    assert_eq!(cache.get("Lisburn").await?, None);
    Ok(())
}

#[tokio::test]
async fn test_lru_eviction_at_capacity() -> Result<()> {
    let cache = create_test_cache(2, 300).await?;

    cache.set("Belfast", "Clear", Duration::from_secs(60)).await?;
    cache.set("Armagh", "Clouds", Duration::from_secs(60)).await?;
    // Touch Belfast so Armagh becomes least recently used
    cache.get("Belfast").await?;
    cache.set("Dublin", "Rain", Duration::from_secs(60)).await?;

    assert!(cache.exists("Belfast").await?);
    assert!(!cache.exists("Armagh").await?);
    assert!(cache.exists("Dublin").await?);
    Ok(())
}

#[tokio::test]
async fn test_background_cleanup_removes_expired_entries() -> Result<()> {
    let cache = InMemoryCache::new(CacheConfig {
        max_entries: 100,
        cleanup_interval: Duration::from_millis(50),
        enable_background_cleanup: true,
        ..CacheConfig::default()
    })
    .await?;

    cache.set("Fermanagh", "Snow", Duration::from_millis(20)).await?;
    assert_eq!(cache.len().await, 1);

    tokio::time::sleep(Duration::from_millis(200)).await;

    assert!(cache.is_empty().await);
    Ok(())
}

#[tokio::test]
async fn test_health_check() -> Result<()> {
    let cache = create_test_cache(10, 300).await?;
    cache.health_check().await?;
    Ok(())
}
