// ABOUTME: Route module organization for the activity server HTTP endpoints
// ABOUTME: Assembles domain routers and wraps them in tracing and timeout middleware
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! HTTP routes
//!
//! Each domain module contains only route definitions and thin handlers that
//! delegate to the service layer.

/// Activity recommendation routes
pub mod activities;
/// Health check and readiness routes
pub mod health;

pub use activities::ActivityRoutes;
pub use health::HealthRoutes;

use crate::cache::factory::Cache;
use crate::service::ActivityService;
use axum::Router;
use fairweather_providers::FaultGuard;
use std::sync::Arc;
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Shared state handed to route handlers
#[derive(Clone)]
pub struct AppState {
    /// Activity selection service
    pub service: Arc<ActivityService>,
    /// Weather condition cache, probed by readiness checks
    pub cache: Cache,
    /// Weather provider fault guard, reported by readiness checks
    pub guard: Arc<dyn FaultGuard>,
}

/// Build the complete router with middleware
///
/// `request_timeout` caps every request; it should exceed the selection timeout
/// so that slow selections surface as `Cancelled` rather than a bare timeout.
pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .merge(ActivityRoutes::routes(state.service.clone()))
        .merge(HealthRoutes::routes(state))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
}
