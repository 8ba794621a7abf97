// ABOUTME: Domain models shared across the workspace
// ABOUTME: Re-exports activity and weather types into a flat namespace
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Leisure activities and request modes
pub mod activity;
/// Weather classification labels
pub mod weather;

pub use activity::{Activity, SelectionMode};
pub use weather::{UnfavorableConditions, WeatherCondition};
