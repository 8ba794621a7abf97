// ABOUTME: Application-wide constants organized by domain
// ABOUTME: Defaults for server, cache, weather provider, circuit breaker and selection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Cache TTLs, capacity and cleanup intervals
pub mod cache;

/// Service identifiers used in logs and health responses
pub mod service_names {
    /// Name of the HTTP server binary
    pub const FAIRWEATHER_SERVER: &str = "fairweather-server";
}

/// Server defaults
pub mod server {
    /// Default HTTP port
    pub const DEFAULT_HTTP_PORT: u16 = 8080;

    /// Default activity database location
    pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/fairweather.db";
}

/// Weather provider defaults
pub mod weather {
    /// Provider name used for logging and breaker identification
    pub const PROVIDER_NAME: &str = "openweathermap";

    /// Default `OpenWeatherMap` base URL
    pub const DEFAULT_API_BASE_URL: &str = "http://api.openweathermap.org";

    /// Current-conditions endpoint path
    pub const CURRENT_WEATHER_PATH: &str = "/data/2.5/weather";

    /// Request timeout for a single classification call
    pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

    /// Connect timeout for the weather HTTP client
    pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

    /// Condition labels that make an outdoor activity unsuitable
    pub const DEFAULT_UNFAVORABLE_CONDITIONS: [&str; 3] = ["Rain", "Snow", "Drizzle"];
}

/// Circuit breaker defaults for the weather provider
pub mod circuit_breaker {
    /// Consecutive failures before the circuit opens
    pub const DEFAULT_FAILURE_THRESHOLD: u32 = 5;

    /// Cool-down before a trial call is allowed
    pub const DEFAULT_RECOVERY_TIMEOUT_SECS: u64 = 30;

    /// Trial calls admitted while half-open
    pub const DEFAULT_HALF_OPEN_MAX_CALLS: u32 = 1;
}

/// Selection engine defaults
pub mod selection {
    /// Rejections allowed beyond the first attempt (4 candidates evaluated at most)
    pub const DEFAULT_MAX_RETRIES: u32 = 3;

    /// Deadline for a whole selection request
    pub const DEFAULT_SELECTION_TIMEOUT_SECS: u64 = 15;
}

/// Redis connection defaults
pub mod redis {
    /// Connection timeout in seconds
    pub const CONNECTION_TIMEOUT_SECS: u64 = 5;
    /// Command response timeout in seconds
    pub const RESPONSE_TIMEOUT_SECS: u64 = 3;
    /// Reconnection attempts after a dropped connection
    pub const RECONNECTION_RETRIES: usize = 3;
    /// Exponential backoff base
    pub const RETRY_EXPONENT_BASE: u64 = 2;
    /// Maximum retry delay in milliseconds
    pub const MAX_RETRY_DELAY_MS: u64 = 5_000;
    /// Startup connection attempts
    pub const INITIAL_CONNECTION_RETRIES: u32 = 3;
    /// First startup retry delay in milliseconds
    pub const INITIAL_RETRY_DELAY_MS: u64 = 500;
}
