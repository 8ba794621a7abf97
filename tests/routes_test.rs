// ABOUTME: HTTP tests for activity and health routes using tower oneshot
// ABOUTME: Tests plain-text responses, error envelopes and readiness reporting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(missing_docs)]

mod common;

use anyhow::Result;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use common::{activity, create_test_cache, ScriptedLookup};
use fairweather_providers::{CircuitBreaker, CircuitBreakerConfig, FaultGuard, ProviderError};
use fairweather_server::models::{Activity, WeatherCondition};
use fairweather_server::routes::{build_router, AppState};
use fairweather_server::selection::{ScriptedSamplers, SelectionConfig, SelectionEngine};
use fairweather_server::service::ActivityService;
use fairweather_server::store::StaticActivitySource;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

async fn test_router(
    lookup: ScriptedLookup,
    activities: Vec<Activity>,
    guard: Arc<dyn FaultGuard>,
) -> Router {
    let engine = SelectionEngine::with_sampler_factory(
        Arc::new(lookup),
        SelectionConfig::default(),
        Arc::new(ScriptedSamplers::new(vec![0, 0, 0, 0])),
    );
    let service = ActivityService::new(Arc::new(StaticActivitySource::new(activities)), engine);
    let state = AppState {
        service: Arc::new(service),
        cache: create_test_cache().await,
        guard,
    };
    build_router(state, Duration::from_secs(30))
}

fn closed_breaker() -> Arc<dyn FaultGuard> {
    Arc::new(CircuitBreaker::new("openweathermap"))
}

async fn get(router: Router, uri: &str) -> Result<(StatusCode, Option<String>, String)> {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty())?)
        .await?;
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, content_type, String::from_utf8(bytes.to_vec())?))
}

#[tokio::test]
async fn test_sunny_returns_name_and_location_as_text() -> Result<()> {
    let router = test_router(
        ScriptedLookup::new().with("Craigavon", WeatherCondition::Clear),
        vec![activity("mini golf", "Craigavon", true)],
        closed_breaker(),
    )
    .await;

    let (status, content_type, body) = get(router, "/activities/sunny").await?;

    assert_eq!(status, StatusCode::OK);
    assert!(content_type.is_some_and(|ct| ct.starts_with("text/plain")));
    assert_eq!(body, "mini golf Craigavon");
    Ok(())
}

#[tokio::test]
async fn test_not_sunny_returns_indoor_activity() -> Result<()> {
    let router = test_router(
        ScriptedLookup::new(),
        vec![
            activity("mini golf", "Craigavon", true),
            activity("cinema", "Lisburn", false),
        ],
        closed_breaker(),
    )
    .await;

    let (status, _, body) = get(router, "/activities/not-sunny").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "cinema Lisburn");
    Ok(())
}

#[tokio::test]
async fn test_exhausted_sunny_is_not_found_with_fallback() -> Result<()> {
    let router = test_router(
        ScriptedLookup::new().with("Lisburn", WeatherCondition::Rain),
        vec![activity("Walk in the park", "Lisburn", true)],
        closed_breaker(),
    )
    .await;

    let (status, _, body) = get(router, "/activities/sunny").await?;
    let json: Value = serde_json::from_str(&body)?;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["code"], "RESOURCE_NOT_FOUND");
    assert_eq!(json["error"]["details"]["alternative"], "/activities/not-sunny");
    Ok(())
}

#[tokio::test]
async fn test_weather_outage_is_service_unavailable() -> Result<()> {
    let router = test_router(
        ScriptedLookup::new().failing(
            "Belfast",
            ProviderError::CircuitOpen {
                provider: "openweathermap".into(),
                retry_after_secs: 12,
            },
        ),
        vec![activity("Hike Cavehill", "Belfast", true)],
        closed_breaker(),
    )
    .await;

    let (status, _, body) = get(router, "/activities/sunny").await?;
    let json: Value = serde_json::from_str(&body)?;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["error"]["details"]["retry_after_secs"], 12);
    assert_eq!(json["error"]["details"]["weather_sensitive"], false);
    Ok(())
}

#[tokio::test]
async fn test_health_endpoint() -> Result<()> {
    let router = test_router(ScriptedLookup::new(), Vec::new(), closed_breaker()).await;

    let (status, _, body) = get(router, "/health").await?;
    let json: Value = serde_json::from_str(&body)?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    Ok(())
}

#[tokio::test]
async fn test_ready_reports_open_circuit_as_degraded() -> Result<()> {
    let breaker = Arc::new(CircuitBreaker::with_config(
        "openweathermap",
        CircuitBreakerConfig::new(1, Duration::from_secs(30), 1),
    ));
    breaker.record_failure();
    let router = test_router(ScriptedLookup::new(), Vec::new(), breaker).await;

    let (status, _, body) = get(router, "/ready").await?;
    let json: Value = serde_json::from_str(&body)?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["weather_circuit"], "open");
    assert_eq!(json["cache"]["backend"], "memory");
    Ok(())
}
