// ABOUTME: Activity service combining the activity source with the selection engine
// ABOUTME: Applies the request deadline across both the candidate fetch and selection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::selection::DEFAULT_SELECTION_TIMEOUT_SECS;
use crate::errors::SelectionError;
use crate::models::SelectionMode;
use crate::selection::{Selection, SelectionEngine};
use crate::store::ActivitySource;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::instrument;

/// Entry point for "pick me an activity" requests
#[derive(Clone)]
pub struct ActivityService {
    source: Arc<dyn ActivitySource>,
    engine: SelectionEngine,
    selection_timeout: Duration,
}

impl ActivityService {
    /// Service with the default selection timeout
    #[must_use]
    pub fn new(source: Arc<dyn ActivitySource>, engine: SelectionEngine) -> Self {
        Self::with_timeout(
            source,
            engine,
            Duration::from_secs(DEFAULT_SELECTION_TIMEOUT_SECS),
        )
    }

    /// Service with a custom per-request timeout
    #[must_use]
    pub fn with_timeout(
        source: Arc<dyn ActivitySource>,
        engine: SelectionEngine,
        selection_timeout: Duration,
    ) -> Self {
        Self {
            source,
            engine,
            selection_timeout,
        }
    }

    /// Fetch candidates for `mode` and run the selection engine on them
    ///
    /// Sun-favoring candidates are weather checked; others are accepted on
    /// the first draw.
    ///
    /// # Errors
    ///
    /// Returns the `SelectionError` of the store fetch or of the engine
    #[instrument(skip(self), fields(mode = %mode))]
    pub async fn select(&self, mode: SelectionMode) -> Result<Selection, SelectionError> {
        let deadline = Instant::now() + self.selection_timeout;

        let candidates = tokio::time::timeout_at(
            deadline,
            self.source.fetch_activities(mode.favors_sun()),
        )
        .await
        .map_err(|_| SelectionError::Cancelled)??;

        self.engine.select(candidates, mode, Some(deadline)).await
    }

    /// Pick an activity that suits the current weather
    ///
    /// # Errors
    ///
    /// See [`ActivityService::select`]
    pub async fn select_sunny(&self) -> Result<Selection, SelectionError> {
        self.select(SelectionMode::Sunny).await
    }

    /// Pick an activity that does not depend on the weather
    ///
    /// # Errors
    ///
    /// See [`ActivityService::select`]
    pub async fn select_not_sunny(&self) -> Result<Selection, SelectionError> {
        self.select(SelectionMode::NotSunny).await
    }
}
