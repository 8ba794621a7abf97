// ABOUTME: External weather provider integrations for the Fairweather service
// ABOUTME: Weather classifier trait, OpenWeatherMap client, circuit breaker and HTTP client helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Weather provider implementations and their fault-tolerance wrapper.
//!
//! The classifier makes exactly one upstream call per invocation. Retry and
//! fail-fast policy belong to the circuit breaker; caching belongs to the
//! server crate.

// Re-export core modules so provider files can use `crate::errors::*`
pub use fairweather_core::constants;
pub use fairweather_core::errors;
pub use fairweather_core::models;

/// Circuit breaker guarding the weather provider
pub mod circuit_breaker;
/// HTTP client construction with timeouts
pub mod http_client;
/// `OpenWeatherMap` current-conditions classifier
pub mod openweather;

pub use circuit_breaker::{
    guarded_call, Admission, CircuitBreaker, CircuitBreakerConfig, CircuitState, FaultGuard,
};
pub use fairweather_core::errors::ProviderError;
pub use openweather::{OpenWeatherClassifier, OpenWeatherConfig, WeatherClassifier};
