// ABOUTME: Server assembly wiring store, cache, breaker, classifier and engine together
// ABOUTME: Builds shared application state and runs the HTTP server until Ctrl-C
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::cache::factory::Cache;
use crate::config::ServerConfig;
use crate::constants::weather::PROVIDER_NAME;
use crate::routes::{build_router, AppState};
use crate::selection::{SelectionConfig, SelectionEngine};
use crate::service::ActivityService;
use crate::store::{ActivitySource, SqliteActivityStore};
use crate::weather::WeatherCache;
use anyhow::{Context, Result};
use fairweather_providers::{CircuitBreaker, FaultGuard, OpenWeatherClassifier};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Headroom between the selection deadline and the HTTP request timeout
const REQUEST_TIMEOUT_MARGIN_SECS: u64 = 5;

/// Construct every long-lived component from configuration
///
/// # Errors
///
/// Returns an error if the activity store or the cache backend cannot be opened
pub async fn build_app_state(config: &ServerConfig) -> Result<AppState> {
    let store = SqliteActivityStore::connect(&config.database_url).await?;
    if config.seed_default_activities {
        store.seed_defaults_if_empty().await?;
    }
    info!(activities = store.count().await?, "Activity store ready");

    let cache = Cache::new(config.cache.clone())
        .await
        .context("Failed to initialize cache backend")?;

    let guard: Arc<dyn FaultGuard> = Arc::new(CircuitBreaker::with_config(
        PROVIDER_NAME,
        config.circuit_breaker.clone(),
    ));
    let classifier = Arc::new(OpenWeatherClassifier::new(config.weather.clone()));
    let weather = WeatherCache::with_ttl(
        cache.clone(),
        classifier,
        guard.clone(),
        Duration::from_secs(config.weather_cache_ttl_secs),
    );

    let engine = SelectionEngine::new(
        Arc::new(weather),
        SelectionConfig {
            max_retries: config.selection.max_retries,
            unfavorable: config.selection.unfavorable.clone(),
        },
    );

    let source: Arc<dyn ActivitySource> = Arc::new(store);
    let service = ActivityService::with_timeout(source, engine, config.selection.timeout());

    Ok(AppState {
        service: Arc::new(service),
        cache,
        guard,
    })
}

/// Run the HTTP server until Ctrl-C
///
/// # Errors
///
/// Returns an error if startup fails or the listener cannot bind
pub async fn run(config: ServerConfig) -> Result<()> {
    let state = build_app_state(&config).await?;
    let request_timeout =
        config.selection.timeout() + Duration::from_secs(REQUEST_TIMEOUT_MARGIN_SECS);
    let app = build_router(state, request_timeout);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind HTTP listener on {addr}"))?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received, draining connections"),
        Err(e) => warn!("Failed to listen for shutdown signal: {}", e),
    }
}
