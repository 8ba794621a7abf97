// ABOUTME: Weather provider error types covering network, payload and breaker failures
// ABOUTME: Classifies which failures count against the circuit breaker
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use thiserror::Error;

/// Failures of the external weather lookup path
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// Connection-level failure talking to the provider
    #[error("Weather provider network error: {0}")]
    Network(String),

    /// The provider did not answer within the request timeout
    #[error("Weather provider request timed out")]
    Timeout,

    /// Non-success HTTP status
    #[error("Weather provider returned status {status}: {message}")]
    HttpStatus {
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },

    /// Body could not be decoded
    #[error("Weather provider returned malformed data: {0}")]
    MalformedResponse(String),

    /// Decoded body carried no weather entries
    #[error("Weather provider returned no conditions for '{location}'")]
    EmptyResponse {
        /// Location that was queried
        location: String,
    },

    /// Missing API key or similar deployment problem
    #[error("Weather provider is not configured: {0}")]
    NotConfigured(String),

    /// Short-circuited by the circuit breaker
    #[error("Circuit breaker open for {provider}, retry after {retry_after_secs}s")]
    CircuitOpen {
        /// Guarded provider name
        provider: String,
        /// Seconds until a trial call will be admitted
        retry_after_secs: u64,
    },

    /// The condition cache backend failed
    #[error("Weather cache unavailable: {0}")]
    Cache(String),
}

impl ProviderError {
    /// Whether this failure indicates upstream trouble and should count against the breaker
    ///
    /// Client-side problems (unknown location, bad API key, missing configuration)
    /// do not mean the provider is down, so they leave the breaker alone.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_)
            | Self::Timeout
            | Self::MalformedResponse(_)
            | Self::EmptyResponse { .. } => true,
            Self::HttpStatus { status, .. } => *status >= 500 || *status == 429,
            Self::NotConfigured(_) | Self::CircuitOpen { .. } | Self::Cache(_) => false,
        }
    }

    /// Retry hint when the breaker rejected the call
    #[must_use]
    pub const fn retry_after_secs(&self) -> Option<u64> {
        match self {
            Self::CircuitOpen {
                retry_after_secs, ..
            } => Some(*retry_after_secs),
            _ => None,
        }
    }
}

#[cfg(feature = "provider-errors")]
impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_decode() {
            Self::MalformedResponse(error.to_string())
        } else if let Some(status) = error.status() {
            Self::HttpStatus {
                status: status.as_u16(),
                message: error.to_string(),
            }
        } else {
            Self::Network(error.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(ProviderError::Timeout.is_retryable());
        assert!(ProviderError::Network("reset".into()).is_retryable());
        assert!(ProviderError::HttpStatus {
            status: 503,
            message: String::new()
        }
        .is_retryable());
        assert!(ProviderError::HttpStatus {
            status: 429,
            message: String::new()
        }
        .is_retryable());
        assert!(!ProviderError::HttpStatus {
            status: 404,
            message: "city not found".into()
        }
        .is_retryable());
        assert!(!ProviderError::NotConfigured("WEATHER_API_KEY".into()).is_retryable());
        assert!(!ProviderError::CircuitOpen {
            provider: "openweathermap".into(),
            retry_after_secs: 3
        }
        .is_retryable());
    }
}
