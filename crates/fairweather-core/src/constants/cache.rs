// ABOUTME: Cache-related constants for TTL, capacity, and cleanup intervals
// ABOUTME: Shared by the in-memory and Redis cache backends
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Default maximum cache entries for in-memory cache
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 10_000;

/// Default cleanup interval in seconds for expired entries
pub const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 300; // 5 minutes

/// Weather condition freshness window (10 minutes)
///
/// Other processes read the same keys, so this value is part of the cache contract.
pub const TTL_WEATHER_CONDITION_SECS: u64 = 600;
