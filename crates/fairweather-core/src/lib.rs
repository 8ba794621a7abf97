// ABOUTME: Core types and constants for the Fairweather activity recommendation service
// ABOUTME: Foundation crate with error handling, activity/weather models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Fairweather Core
//!
//! Foundation crate providing shared types and constants for the Fairweather
//! service. Both the providers crate and the server crate depend on it, so it
//! is kept free of I/O.
//!
//! ## Modules
//!
//! - **errors**: `AppError`/`ErrorCode` for the HTTP edge, `ProviderError` and `SelectionError`
//! - **models**: `Activity`, `SelectionMode`, `WeatherCondition`, `UnfavorableConditions`
//! - **constants**: defaults for cache, weather provider, breaker and selection

/// Unified error handling with standard error codes and HTTP responses
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Activity and weather domain models
pub mod models;
