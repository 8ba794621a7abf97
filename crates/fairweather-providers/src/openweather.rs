// ABOUTME: OpenWeatherMap current-conditions client reducing a response to one condition label
// ABOUTME: One outbound GET per classification; no caching and no retries here
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Weather classification against the `OpenWeatherMap` current weather API

use crate::constants::weather::{
    CURRENT_WEATHER_PATH, DEFAULT_API_BASE_URL, DEFAULT_CONNECT_TIMEOUT_SECS,
    DEFAULT_REQUEST_TIMEOUT_SECS, PROVIDER_NAME,
};
use crate::errors::ProviderError;
use crate::http_client::create_client_with_timeout;
use crate::models::WeatherCondition;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt;

/// Longest error body we keep in an error message
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Reduces the current weather at a location to a single condition
#[async_trait]
pub trait WeatherClassifier: Send + Sync {
    /// Classify the current weather at `location`
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` on network failure, timeout, non-success status,
    /// or a response without weather entries
    async fn classify(&self, location: &str) -> Result<WeatherCondition, ProviderError>;
}

/// Connection settings for the `OpenWeatherMap` API
#[derive(Clone, PartialEq, Eq)]
pub struct OpenWeatherConfig {
    /// Base URL without trailing path, e.g. `http://api.openweathermap.org`
    pub base_url: String,
    /// API key sent as `appid`
    pub api_key: Option<String>,
    /// Whole-request timeout
    pub request_timeout_secs: u64,
    /// TCP connect timeout
    pub connect_timeout_secs: u64,
}

impl Default for OpenWeatherConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_owned(),
            api_key: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

// Keeps the API key out of logs
impl fmt::Debug for OpenWeatherConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenWeatherConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

/// Current weather response; only the fields we classify on
#[derive(Debug, Deserialize)]
struct CurrentWeatherResponse {
    #[serde(default)]
    weather: Vec<WeatherEntry>,
}

/// Weather condition entry from `OpenWeatherMap`
#[derive(Debug, Deserialize)]
struct WeatherEntry {
    /// Main weather category (e.g., "Rain", "Clear")
    main: String,
}

/// Parse a current weather payload into the first entry's main category
///
/// # Errors
///
/// Returns `MalformedResponse` for invalid JSON and `EmptyResponse` when the
/// `weather` array is missing or empty, or its first entry has no category
pub fn parse_current_weather(
    location: &str,
    body: &str,
) -> Result<WeatherCondition, ProviderError> {
    let response: CurrentWeatherResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

    response
        .weather
        .into_iter()
        .next()
        .map(|entry| entry.main)
        .filter(|main| !main.trim().is_empty())
        .map(|main| WeatherCondition::from_label(&main))
        .ok_or_else(|| ProviderError::EmptyResponse {
            location: location.to_owned(),
        })
}

/// `OpenWeatherMap` classifier
pub struct OpenWeatherClassifier {
    client: Client,
    config: OpenWeatherConfig,
}

impl OpenWeatherClassifier {
    /// Create a classifier with its own timeout-bounded HTTP client
    #[must_use]
    pub fn new(config: OpenWeatherConfig) -> Self {
        Self {
            client: create_client_with_timeout(
                config.request_timeout_secs,
                config.connect_timeout_secs,
            ),
            config,
        }
    }

    /// Get the current configuration
    #[must_use]
    pub const fn config(&self) -> &OpenWeatherConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!(
            "{}{}",
            self.config.base_url.trim_end_matches('/'),
            CURRENT_WEATHER_PATH
        )
    }
}

#[async_trait]
impl WeatherClassifier for OpenWeatherClassifier {
    async fn classify(&self, location: &str) -> Result<WeatherCondition, ProviderError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ProviderError::NotConfigured("WEATHER_API_KEY is not set".into()))?;

        tracing::debug!(provider = PROVIDER_NAME, %location, "Fetching current weather");

        let response = self
            .client
            .get(self.endpoint())
            .query(&[("appid", api_key), ("q", location)])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
            return Err(ProviderError::HttpStatus {
                status: status.as_u16(),
                message,
            });
        }

        let condition = parse_current_weather(location, &body)?;
        tracing::debug!(provider = PROVIDER_NAME, %location, %condition, "Classified weather");
        Ok(condition)
    }
}
