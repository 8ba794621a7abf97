// ABOUTME: Weather condition labels reported by the provider and the unfavorable set
// ABOUTME: Labels round-trip as the provider's exact "main" strings for cache sharing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::weather::DEFAULT_UNFAVORABLE_CONDITIONS;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Main weather category for a location
///
/// The string form is exactly the provider's label ("Clear", "Rain", ...),
/// which is also what the cache stores.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WeatherCondition {
    /// Clear sky
    Clear,
    /// Any cloud cover
    Clouds,
    /// Rain
    Rain,
    /// Drizzle
    Drizzle,
    /// Snow
    Snow,
    /// Thunderstorm
    Thunderstorm,
    /// Mist
    Mist,
    /// Smoke
    Smoke,
    /// Haze
    Haze,
    /// Dust
    Dust,
    /// Fog
    Fog,
    /// Sand
    Sand,
    /// Volcanic ash
    Ash,
    /// Squalls
    Squall,
    /// Tornado
    Tornado,
    /// A label this build does not know about
    Other(String),
}

impl WeatherCondition {
    /// Parse a provider label, keeping unknown labels verbatim
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "clear" => Self::Clear,
            "clouds" => Self::Clouds,
            "rain" => Self::Rain,
            "drizzle" => Self::Drizzle,
            "snow" => Self::Snow,
            "thunderstorm" => Self::Thunderstorm,
            "mist" => Self::Mist,
            "smoke" => Self::Smoke,
            "haze" => Self::Haze,
            "dust" => Self::Dust,
            "fog" => Self::Fog,
            "sand" => Self::Sand,
            "ash" => Self::Ash,
            "squall" => Self::Squall,
            "tornado" => Self::Tornado,
            _ => Self::Other(trimmed.to_owned()),
        }
    }

    /// The provider label for this condition
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Clear => "Clear",
            Self::Clouds => "Clouds",
            Self::Rain => "Rain",
            Self::Drizzle => "Drizzle",
            Self::Snow => "Snow",
            Self::Thunderstorm => "Thunderstorm",
            Self::Mist => "Mist",
            Self::Smoke => "Smoke",
            Self::Haze => "Haze",
            Self::Dust => "Dust",
            Self::Fog => "Fog",
            Self::Sand => "Sand",
            Self::Ash => "Ash",
            Self::Squall => "Squall",
            Self::Tornado => "Tornado",
            Self::Other(label) => label,
        }
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeatherCondition {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_label(s))
    }
}

impl From<String> for WeatherCondition {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

impl From<WeatherCondition> for String {
    fn from(condition: WeatherCondition) -> Self {
        match condition {
            WeatherCondition::Other(label) => label,
            known => known.as_str().to_owned(),
        }
    }
}

/// Conditions under which a weather-sensitive activity is rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnfavorableConditions {
    conditions: HashSet<WeatherCondition>,
}

impl UnfavorableConditions {
    /// Build the set from provider labels
    #[must_use]
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            conditions: labels
                .into_iter()
                .map(|label| label.as_ref().trim().to_owned())
                .filter(|label| !label.is_empty())
                .map(|label| WeatherCondition::from_label(&label))
                .collect(),
        }
    }

    /// Parse a comma separated list such as `"Rain,Snow,Drizzle"`
    #[must_use]
    pub fn parse_list(list: &str) -> Self {
        Self::from_labels(list.split(','))
    }

    /// Whether the condition rules out a weather-sensitive activity
    #[must_use]
    pub fn contains(&self, condition: &WeatherCondition) -> bool {
        self.conditions.contains(condition)
    }

    /// Number of conditions in the set
    #[must_use]
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// Whether the set is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Labels in the set, sorted for stable output
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self
            .conditions
            .iter()
            .map(|condition| condition.as_str().to_owned())
            .collect();
        labels.sort();
        labels
    }
}

impl Default for UnfavorableConditions {
    fn default() -> Self {
        Self::from_labels(DEFAULT_UNFAVORABLE_CONDITIONS)
    }
}
