// ABOUTME: Error taxonomy for a single activity selection run
// ABOUTME: Only weather rejections retry; every variant here ends the run
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::ProviderError;
use thiserror::Error;

/// Terminal failures of a selection request
#[derive(Debug, Error)]
pub enum SelectionError {
    /// The engine was handed an empty candidate pool
    #[error("Invalid selection input: {0}")]
    InvalidInput(String),

    /// The weather lookup failed mid-run
    #[error("Weather unavailable: {0}")]
    WeatherUnavailable(#[source] ProviderError),

    /// Every evaluated candidate had unfavorable weather
    #[error("No suitable activity found after {attempts} attempts")]
    SelectionExhausted {
        /// Candidates rejected before giving up
        attempts: u32,
    },

    /// Fetching candidates from the activity store failed
    #[error("Activity store error: {0}")]
    Store(String),

    /// The caller's deadline passed before a decision was reached
    #[error("Selection cancelled before completion")]
    Cancelled,
}

impl From<ProviderError> for SelectionError {
    fn from(error: ProviderError) -> Self {
        Self::WeatherUnavailable(error)
    }
}
