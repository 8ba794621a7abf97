// ABOUTME: Leisure activity model and the sunny/not-sunny request mode
// ABOUTME: Activities are immutable values with structural identity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::fmt;

/// A leisure activity at a named location
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Activity {
    /// Display name, e.g. "mini golf"
    pub name: String,
    /// Location passed to the weather provider, e.g. "Craigavon"
    pub location: String,
    /// Whether the activity is meant for sunny weather
    pub favors_sun: bool,
}

impl Activity {
    /// Create a new activity
    #[must_use]
    pub fn new(name: impl Into<String>, location: impl Into<String>, favors_sun: bool) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            favors_sun,
        }
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.location)
    }
}

/// Which kind of activity the caller asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// Outdoor activity; requires favorable weather at the location
    Sunny,
    /// Any-weather activity; weather is not consulted
    NotSunny,
}

impl SelectionMode {
    /// The `favors_sun` flag used to filter candidates
    #[must_use]
    pub const fn favors_sun(self) -> bool {
        matches!(self, Self::Sunny)
    }

    /// Whether candidates must pass a live weather check
    #[must_use]
    pub const fn is_weather_sensitive(self) -> bool {
        matches!(self, Self::Sunny)
    }

    /// Stable name for logs and URLs
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sunny => "sunny",
            Self::NotSunny => "not_sunny",
        }
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
