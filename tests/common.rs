// ABOUTME: Shared test utilities and doubles for integration tests
// ABOUTME: Provides quiet logging, in-memory caches, scripted lookups and counting classifiers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `fairweather_server`

use async_trait::async_trait;
use fairweather_providers::{Admission, CircuitState, FaultGuard, ProviderError, WeatherClassifier};
use fairweather_server::cache::factory::Cache;
use fairweather_server::models::{Activity, WeatherCondition};
use fairweather_server::weather::ConditionLookup;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, Once};
use std::time::Duration;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// In-memory cache without the background cleanup task
pub async fn create_test_cache() -> Cache {
    Cache::in_memory(100).await.unwrap()
}

/// Shorthand for building activities
pub fn activity(name: &str, location: &str, favors_sun: bool) -> Activity {
    Activity::new(name, location, favors_sun)
}

/// Lookup answering from a fixed location table and recording every call
#[derive(Default)]
pub struct ScriptedLookup {
    answers: HashMap<String, Result<WeatherCondition, ProviderError>>,
    calls: Mutex<Vec<String>>,
    delay: Option<Duration>,
}

impl ScriptedLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `condition` for `location`
    pub fn with(mut self, location: &str, condition: WeatherCondition) -> Self {
        self.answers.insert(location.to_owned(), Ok(condition));
        self
    }

    /// Fail lookups for `location`
    pub fn failing(mut self, location: &str, error: ProviderError) -> Self {
        self.answers.insert(location.to_owned(), Err(error));
        self
    }

    /// Sleep before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Locations looked up, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ConditionLookup for ScriptedLookup {
    async fn get_condition(&self, location: &str) -> Result<WeatherCondition, ProviderError> {
        self.calls.lock().unwrap().push(location.to_owned());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.answers
            .get(location)
            .cloned()
            .unwrap_or(Ok(WeatherCondition::Clear))
    }
}

/// Classifier returning a fixed result and counting upstream calls
pub struct CountingClassifier {
    result: Mutex<Result<WeatherCondition, ProviderError>>,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl CountingClassifier {
    pub fn returning(condition: WeatherCondition) -> Self {
        Self {
            result: Mutex::new(Ok(condition)),
            calls: AtomicUsize::new(0),
            delay: None,
        }
    }

    pub fn failing(error: ProviderError) -> Self {
        Self {
            result: Mutex::new(Err(error)),
            calls: AtomicUsize::new(0),
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Change the answer for subsequent calls
    pub fn set_result(&self, result: Result<WeatherCondition, ProviderError>) {
        *self.result.lock().unwrap() = result;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherClassifier for CountingClassifier {
    async fn classify(&self, _location: &str) -> Result<WeatherCondition, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.result.lock().unwrap().clone()
    }
}

/// Guard that admits every call and records reported outcomes
#[derive(Default)]
pub struct RecordingGuard {
    pub successes: AtomicUsize,
    pub failures: AtomicUsize,
}

impl FaultGuard for RecordingGuard {
    fn try_acquire(&self) -> Result<Admission, ProviderError> {
        Ok(Admission::regular())
    }

    fn record_success(&self) {
        self.successes.fetch_add(1, Ordering::SeqCst);
    }

    fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::SeqCst);
    }

    fn state(&self) -> CircuitState {
        CircuitState::Closed
    }
}
