// ABOUTME: Tests for environment-driven server configuration
// ABOUTME: Validates defaults, overrides, parse failures and validation rules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use fairweather_server::config::{Environment, ServerConfig};
use fairweather_server::models::WeatherCondition;
use serial_test::serial;
use std::env;
use std::time::Duration;

const MANAGED_VARS: [&str; 14] = [
    "HTTP_PORT",
    "ENVIRONMENT",
    "DATABASE_URL",
    "DATABASE_SEED_DEFAULTS",
    "REDIS_URL",
    "WEATHER_API_KEY",
    "WEATHER_API_BASE_URL",
    "WEATHER_CACHE_TTL_SECS",
    "CIRCUIT_BREAKER_FAILURE_THRESHOLD",
    "CIRCUIT_BREAKER_RECOVERY_TIMEOUT_SECS",
    "CIRCUIT_BREAKER_HALF_OPEN_MAX_CALLS",
    "SELECTION_MAX_RETRIES",
    "SELECTION_TIMEOUT_SECS",
    "UNFAVORABLE_CONDITIONS",
];

fn clear_env() {
    for key in MANAGED_VARS {
        env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_defaults_without_environment() {
    clear_env();

    let config = ServerConfig::from_env().unwrap();

    assert_eq!(config.http_port, 8080);
    assert_eq!(config.environment, Environment::Development);
    assert_eq!(config.database_url, "sqlite:./data/fairweather.db");
    assert!(config.seed_default_activities);
    assert!(config.cache.redis_url.is_none());
    assert_eq!(config.weather_cache_ttl_secs, 600);
    assert!(config.weather.api_key.is_none());
    assert_eq!(config.weather.base_url, "http://api.openweathermap.org");
    assert_eq!(config.circuit_breaker.failure_threshold, 5);
    assert_eq!(config.circuit_breaker.recovery_timeout, Duration::from_secs(30));
    assert_eq!(config.selection.max_retries, 3);
    assert_eq!(config.selection.timeout(), Duration::from_secs(15));
    assert_eq!(
        config.selection.unfavorable.labels(),
        vec!["Drizzle", "Rain", "Snow"]
    );
}

#[test]
#[serial]
fn test_overrides_from_environment() {
    clear_env();
    env::set_var("HTTP_PORT", "9090");
    env::set_var("ENVIRONMENT", "production");
    env::set_var("WEATHER_API_KEY", "abc123");
    env::set_var("CIRCUIT_BREAKER_FAILURE_THRESHOLD", "2");
    env::set_var("SELECTION_MAX_RETRIES", "5");
    env::set_var("UNFAVORABLE_CONDITIONS", "Thunderstorm, Fog");

    let config = ServerConfig::from_env().unwrap();
    clear_env();

    assert_eq!(config.http_port, 9090);
    assert!(config.environment.is_production());
    assert_eq!(config.weather.api_key.as_deref(), Some("abc123"));
    assert_eq!(config.circuit_breaker.failure_threshold, 2);
    assert_eq!(config.selection.max_retries, 5);
    assert!(config
        .selection
        .unfavorable
        .contains(&WeatherCondition::Thunderstorm));
    assert!(!config.selection.unfavorable.contains(&WeatherCondition::Rain));
}

#[test]
#[serial]
fn test_unparseable_value_is_rejected() {
    clear_env();
    env::set_var("SELECTION_TIMEOUT_SECS", "soon");

    let error = ServerConfig::from_env().unwrap_err();
    clear_env();

    assert!(error.to_string().contains("SELECTION_TIMEOUT_SECS"));
}

#[test]
#[serial]
fn test_zero_port_fails_validation() {
    clear_env();
    env::set_var("HTTP_PORT", "0");

    let result = ServerConfig::from_env();
    clear_env();

    assert!(result.is_err());
}

#[test]
#[serial]
fn test_empty_unfavorable_list_fails_validation() {
    clear_env();
    env::set_var("UNFAVORABLE_CONDITIONS", " , ");

    let result = ServerConfig::from_env();
    clear_env();

    assert!(result.is_err());
}

#[test]
fn test_summary_mentions_backends() {
    let mut config = ServerConfig::default();
    config.cache.redis_url = Some("redis://localhost:6379".into());

    let summary = config.summary();

    assert!(summary.contains("Cache: Redis"));
    assert!(summary.contains("Weather Service: Disabled"));
}
