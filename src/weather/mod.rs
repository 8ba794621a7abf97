// ABOUTME: Cache-aside weather condition lookup in front of the guarded classifier
// ABOUTME: Serves fresh cached labels and records new classifications with a fixed TTL
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Weather condition lookup for the selection engine
//!
//! The cache is keyed by the raw location string and stores the raw condition
//! label. Failures are never cached, so the next request retries upstream
//! (subject to the fault guard).

use crate::cache::factory::Cache;
use crate::constants::cache::TTL_WEATHER_CONDITION_SECS;
use crate::models::WeatherCondition;
use async_trait::async_trait;
use fairweather_providers::{guarded_call, FaultGuard, ProviderError, WeatherClassifier};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Resolves the current weather condition for a location
#[async_trait]
pub trait ConditionLookup: Send + Sync {
    /// Current condition at `location`
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` when no fresh cached value exists and the
    /// upstream lookup fails or is rejected by the fault guard
    async fn get_condition(&self, location: &str) -> Result<WeatherCondition, ProviderError>;
}

/// Cache-aside wrapper around a classifier and its fault guard
#[derive(Clone)]
pub struct WeatherCache {
    cache: Cache,
    classifier: Arc<dyn WeatherClassifier>,
    guard: Arc<dyn FaultGuard>,
    ttl: Duration,
}

impl WeatherCache {
    /// Create a weather cache with the default condition TTL
    #[must_use]
    pub fn new(
        cache: Cache,
        classifier: Arc<dyn WeatherClassifier>,
        guard: Arc<dyn FaultGuard>,
    ) -> Self {
        Self::with_ttl(
            cache,
            classifier,
            guard,
            Duration::from_secs(TTL_WEATHER_CONDITION_SECS),
        )
    }

    /// Create a weather cache with a custom TTL
    #[must_use]
    pub fn with_ttl(
        cache: Cache,
        classifier: Arc<dyn WeatherClassifier>,
        guard: Arc<dyn FaultGuard>,
        ttl: Duration,
    ) -> Self {
        Self {
            cache,
            classifier,
            guard,
            ttl,
        }
    }

    /// TTL applied to newly cached conditions
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fault guard shared with the rest of the server
    #[must_use]
    pub fn guard(&self) -> &Arc<dyn FaultGuard> {
        &self.guard
    }
}

#[async_trait]
impl ConditionLookup for WeatherCache {
    #[instrument(skip(self), fields(cache.backend = self.cache.backend_name()))]
    async fn get_condition(&self, location: &str) -> Result<WeatherCondition, ProviderError> {
        let cached = self
            .cache
            .get(location)
            .await
            .map_err(|e| ProviderError::Cache(e.to_string()))?;

        if let Some(label) = cached {
            debug!(%location, condition = %label, "Weather cache hit");
            return Ok(WeatherCondition::from_label(&label));
        }

        debug!(%location, "Weather cache miss");
        let condition =
            guarded_call(self.guard.as_ref(), self.classifier.classify(location)).await?;

        // The classification is still valid when the write fails; the next miss refetches
        if let Err(e) = self.cache.set(location, condition.as_str(), self.ttl).await {
            warn!(%location, error = %e, "Failed to cache weather condition");
        }

        Ok(condition)
    }
}
