// ABOUTME: Health check route handlers for service monitoring and status endpoints
// ABOUTME: Liveness reports the process; readiness probes the cache and the weather breaker
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Health check routes for service monitoring

use super::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use fairweather_providers::CircuitState;
use serde_json::{json, Value};

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all health check routes
    pub fn routes(state: AppState) -> Router {
        Router::new()
            .route("/health", get(Self::health_handler))
            .route("/ready", get(Self::ready_handler))
            .with_state(state)
    }

    async fn health_handler() -> Json<Value> {
        Json(json!({
            "status": "healthy",
            "timestamp": chrono::Utc::now().to_rfc3339()
        }))
    }

    /// Ready when the cache answers; an open weather circuit only degrades sunny requests
    async fn ready_handler(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
        let cache_result = state.cache.health_check().await;
        let circuit = state.guard.state();

        let status = if cache_result.is_err() {
            "unavailable"
        } else if circuit == CircuitState::Closed {
            "ready"
        } else {
            "degraded"
        };

        let code = if cache_result.is_ok() {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };

        (
            code,
            Json(json!({
                "status": status,
                "cache": {
                    "backend": state.cache.backend_name(),
                    "healthy": cache_result.is_ok(),
                    "error": cache_result.err().map(|e| e.to_string()),
                },
                "weather_circuit": circuit.as_str(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            })),
        )
    }
}
