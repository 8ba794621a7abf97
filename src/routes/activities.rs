// ABOUTME: Route handlers for activity recommendations
// ABOUTME: Returns the chosen activity as plain text or a JSON error envelope
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::{AppError, SelectionError};
use crate::logging::AppLogger;
use crate::models::SelectionMode;
use crate::service::ActivityService;
use axum::{extract::State, routing::get, Router};
use std::sync::Arc;
use std::time::Instant;

/// Path of the weather-independent endpoint, offered as a fallback
pub const NOT_SUNNY_PATH: &str = "/activities/not-sunny";

/// Activity routes
pub struct ActivityRoutes;

impl ActivityRoutes {
    /// Create all activity routes
    pub fn routes(service: Arc<ActivityService>) -> Router {
        Router::new()
            .route("/activities/sunny", get(Self::handle_sunny))
            .route(NOT_SUNNY_PATH, get(Self::handle_not_sunny))
            .with_state(service)
    }

    async fn handle_sunny(State(service): State<Arc<ActivityService>>) -> Result<String, AppError> {
        Self::respond(&service, SelectionMode::Sunny).await
    }

    async fn handle_not_sunny(
        State(service): State<Arc<ActivityService>>,
    ) -> Result<String, AppError> {
        Self::respond(&service, SelectionMode::NotSunny).await
    }

    async fn respond(service: &ActivityService, mode: SelectionMode) -> Result<String, AppError> {
        let started = Instant::now();
        let result = service.select(mode).await;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        match result {
            Ok(selection) => {
                AppLogger::log_selection(
                    mode.as_str(),
                    "selected",
                    selection.evaluated,
                    elapsed_ms,
                );
                Ok(selection.activity.to_string())
            }
            Err(error) => {
                tracing::warn!(mode = %mode, error = %error, elapsed_ms, "Selection failed");
                Err(Self::to_app_error(error, mode))
            }
        }
    }

    /// Map a selection failure, pointing weather-sensitive callers at the fallback endpoint
    fn to_app_error(error: SelectionError, mode: SelectionMode) -> AppError {
        let suggest_fallback = mode.is_weather_sensitive()
            && matches!(
                error,
                SelectionError::WeatherUnavailable(_) | SelectionError::SelectionExhausted { .. }
            );

        let mut app_error = AppError::from(error);
        if suggest_fallback {
            if let Some(details) = app_error.details.as_object_mut() {
                details.insert("alternative".into(), NOT_SUNNY_PATH.into());
            }
        }
        app_error
    }
}
