// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Parses environment variables into typed server, cache, weather and selection settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration management

use crate::cache::CacheConfig;
use crate::constants::cache::TTL_WEATHER_CONDITION_SECS;
use crate::constants::circuit_breaker::{
    DEFAULT_FAILURE_THRESHOLD, DEFAULT_HALF_OPEN_MAX_CALLS, DEFAULT_RECOVERY_TIMEOUT_SECS,
};
use crate::constants::redis;
use crate::constants::selection::{DEFAULT_MAX_RETRIES, DEFAULT_SELECTION_TIMEOUT_SECS};
use crate::constants::server::{DEFAULT_DATABASE_URL, DEFAULT_HTTP_PORT};
use crate::constants::weather::{
    DEFAULT_API_BASE_URL, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS,
};
use crate::models::UnfavorableConditions;
use anyhow::{Context, Result};
use fairweather_providers::{CircuitBreakerConfig, OpenWeatherConfig};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Environment type for deployment-specific behavior
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Parse an environment variable, falling back to `default` when unset or empty
///
/// # Errors
///
/// Returns an error naming the variable when it is set but does not parse
pub fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("Invalid {key} value: {raw}")),
        _ => Ok(default),
    }
}

/// Redis connection and retry configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RedisConnectionConfig {
    /// Connection timeout in seconds
    pub connection_timeout_secs: u64,
    /// Response/command timeout in seconds
    pub response_timeout_secs: u64,
    /// Number of reconnection retries after connection drop
    pub reconnection_retries: usize,
    /// Exponential backoff base for retry delays
    pub retry_exponent_base: u64,
    /// Maximum retry delay in milliseconds
    pub max_retry_delay_ms: u64,
    /// Number of retries for initial connection at startup
    pub initial_connection_retries: u32,
    /// Initial retry delay in milliseconds (doubles with exponential backoff)
    pub initial_retry_delay_ms: u64,
}

impl Default for RedisConnectionConfig {
    fn default() -> Self {
        Self {
            connection_timeout_secs: redis::CONNECTION_TIMEOUT_SECS,
            response_timeout_secs: redis::RESPONSE_TIMEOUT_SECS,
            reconnection_retries: redis::RECONNECTION_RETRIES,
            retry_exponent_base: redis::RETRY_EXPONENT_BASE,
            max_retry_delay_ms: redis::MAX_RETRY_DELAY_MS,
            initial_connection_retries: redis::INITIAL_CONNECTION_RETRIES,
            initial_retry_delay_ms: redis::INITIAL_RETRY_DELAY_MS,
        }
    }
}

impl RedisConnectionConfig {
    /// Load Redis connection configuration from environment
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to an unparseable value
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            connection_timeout_secs: parse_env(
                "REDIS_CONNECTION_TIMEOUT_SECS",
                redis::CONNECTION_TIMEOUT_SECS,
            )?,
            response_timeout_secs: parse_env(
                "REDIS_RESPONSE_TIMEOUT_SECS",
                redis::RESPONSE_TIMEOUT_SECS,
            )?,
            reconnection_retries: parse_env(
                "REDIS_RECONNECTION_RETRIES",
                redis::RECONNECTION_RETRIES,
            )?,
            retry_exponent_base: parse_env(
                "REDIS_RETRY_EXPONENT_BASE",
                redis::RETRY_EXPONENT_BASE,
            )?,
            max_retry_delay_ms: parse_env("REDIS_MAX_RETRY_DELAY_MS", redis::MAX_RETRY_DELAY_MS)?,
            initial_connection_retries: parse_env(
                "REDIS_INITIAL_CONNECTION_RETRIES",
                redis::INITIAL_CONNECTION_RETRIES,
            )?,
            initial_retry_delay_ms: parse_env(
                "REDIS_INITIAL_RETRY_DELAY_MS",
                redis::INITIAL_RETRY_DELAY_MS,
            )?,
        })
    }
}

/// Selection loop settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSettings {
    /// Rejections tolerated before the run gives up
    pub max_retries: u32,
    /// Whole-request deadline, covering the store fetch and every weather check
    pub timeout_secs: u64,
    /// Conditions that disqualify a sun-favoring candidate
    pub unfavorable: UnfavorableConditions,
}

impl Default for SelectionSettings {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            timeout_secs: DEFAULT_SELECTION_TIMEOUT_SECS,
            unfavorable: UnfavorableConditions::default(),
        }
    }
}

impl SelectionSettings {
    /// Load selection settings from environment
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to an unparseable value
    pub fn from_env() -> Result<Self> {
        let unfavorable = match env::var("UNFAVORABLE_CONDITIONS") {
            Ok(list) => UnfavorableConditions::parse_list(&list),
            Err(_) => UnfavorableConditions::default(),
        };

        Ok(Self {
            max_retries: parse_env("SELECTION_MAX_RETRIES", DEFAULT_MAX_RETRIES)?,
            timeout_secs: parse_env("SELECTION_TIMEOUT_SECS", DEFAULT_SELECTION_TIMEOUT_SECS)?,
            unfavorable,
        })
    }

    /// Deadline applied to each selection request
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Top-level server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// `SQLite` connection URL for the activity store
    pub database_url: String,
    /// Insert the default activities into an empty store
    pub seed_default_activities: bool,
    /// Cache backend settings
    pub cache: CacheConfig,
    /// TTL of cached weather conditions
    pub weather_cache_ttl_secs: u64,
    /// Weather provider connection settings
    pub weather: OpenWeatherConfig,
    /// Fault guard thresholds
    pub circuit_breaker: CircuitBreakerConfig,
    /// Selection loop settings
    pub selection: SelectionSettings,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: DEFAULT_HTTP_PORT,
            environment: Environment::default(),
            database_url: DEFAULT_DATABASE_URL.to_owned(),
            seed_default_activities: true,
            cache: CacheConfig::default(),
            weather_cache_ttl_secs: TTL_WEATHER_CONDITION_SECS,
            weather: OpenWeatherConfig::default(),
            circuit_breaker: CircuitBreakerConfig::default(),
            selection: SelectionSettings::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a variable does not parse or validation fails
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let config = Self {
            http_port: parse_env("HTTP_PORT", DEFAULT_HTTP_PORT)?,
            environment: Environment::from_str_or_default(
                &env::var("ENVIRONMENT").unwrap_or_default(),
            ),
            database_url: env::var("DATABASE_URL")
                .ok()
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_owned()),
            seed_default_activities: parse_env("DATABASE_SEED_DEFAULTS", true)?,
            cache: CacheConfig::from_env()?,
            weather_cache_ttl_secs: parse_env(
                "WEATHER_CACHE_TTL_SECS",
                TTL_WEATHER_CONDITION_SECS,
            )?,
            weather: OpenWeatherConfig {
                base_url: env::var("WEATHER_API_BASE_URL")
                    .ok()
                    .filter(|url| !url.is_empty())
                    .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned()),
                api_key: env::var("WEATHER_API_KEY").ok().filter(|k| !k.is_empty()),
                request_timeout_secs: parse_env(
                    "WEATHER_REQUEST_TIMEOUT_SECS",
                    DEFAULT_REQUEST_TIMEOUT_SECS,
                )?,
                connect_timeout_secs: parse_env(
                    "WEATHER_CONNECT_TIMEOUT_SECS",
                    DEFAULT_CONNECT_TIMEOUT_SECS,
                )?,
            },
            circuit_breaker: CircuitBreakerConfig::new(
                parse_env("CIRCUIT_BREAKER_FAILURE_THRESHOLD", DEFAULT_FAILURE_THRESHOLD)?,
                Duration::from_secs(parse_env(
                    "CIRCUIT_BREAKER_RECOVERY_TIMEOUT_SECS",
                    DEFAULT_RECOVERY_TIMEOUT_SECS,
                )?),
                parse_env(
                    "CIRCUIT_BREAKER_HALF_OPEN_MAX_CALLS",
                    DEFAULT_HALF_OPEN_MAX_CALLS,
                )?,
            ),
            selection: SelectionSettings::from_env()?,
        };

        config.validate()?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error for values the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.http_port == 0 {
            return Err(anyhow::anyhow!("HTTP_PORT must be non-zero"));
        }

        if self.circuit_breaker.failure_threshold == 0 {
            return Err(anyhow::anyhow!(
                "CIRCUIT_BREAKER_FAILURE_THRESHOLD must be at least 1"
            ));
        }

        if self.circuit_breaker.half_open_max_calls == 0 {
            return Err(anyhow::anyhow!(
                "CIRCUIT_BREAKER_HALF_OPEN_MAX_CALLS must be at least 1"
            ));
        }

        if self.selection.unfavorable.is_empty() {
            return Err(anyhow::anyhow!(
                "UNFAVORABLE_CONDITIONS must name at least one condition"
            ));
        }

        if self.selection.timeout_secs == 0 {
            return Err(anyhow::anyhow!("SELECTION_TIMEOUT_SECS must be non-zero"));
        }

        if self.weather.api_key.is_none() {
            tracing::warn!("WEATHER_API_KEY is not set; sunny selections will be unavailable");
        }

        Ok(())
    }

    /// Get a summary of the configuration for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Fairweather Server Configuration:\n\
             - Environment: {}\n\
             - HTTP Port: {}\n\
             - Database: {}\n\
             - Cache: {}\n\
             - Weather Service: {}\n\
             - Weather Cache TTL: {}s\n\
             - Circuit Breaker: {} failures / {}s recovery / {} trial calls\n\
             - Selection: {} retries / {}s timeout / unfavorable [{}]",
            self.environment,
            self.http_port,
            self.database_url,
            if self.cache.redis_url.is_some() {
                "Redis"
            } else {
                "In-memory"
            },
            if self.weather.api_key.is_some() {
                "Enabled"
            } else {
                "Disabled"
            },
            self.weather_cache_ttl_secs,
            self.circuit_breaker.failure_threshold,
            self.circuit_breaker.recovery_timeout.as_secs(),
            self.circuit_breaker.half_open_max_calls,
            self.selection.max_retries,
            self.selection.timeout_secs,
            self.selection.unfavorable.labels().join(","),
        )
    }
}
