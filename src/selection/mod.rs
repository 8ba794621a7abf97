// ABOUTME: Weather-aware selection engine drawing random candidates until one fits the weather
// ABOUTME: Bounded retry loop with per-run pool, discarded set and attempt counter
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Selection engine
//!
//! One `select` call owns all of its state:
//!
//! - the candidate pool, which only shrinks as candidates are rejected,
//! - the discarded list, disjoint from the pool,
//! - the attempt counter, incremented once per rejection.
//!
//! A run for a weather-insensitive mode accepts the first draw without any
//! weather lookup. A weather-sensitive run draws, looks up the condition and
//! rejects candidates whose location reports an unfavorable condition, giving
//! up once more than `max_retries` candidates have been rejected. Provider
//! failures end the run immediately; the engine never retries a failed lookup.

/// Candidate index sampling
pub mod sampler;

pub use sampler::{Sampler, SamplerFactory, ScriptedSamplers, TimeSeededSamplers};

use crate::constants::selection::DEFAULT_MAX_RETRIES;
use crate::errors::SelectionError;
use crate::models::{Activity, SelectionMode, UnfavorableConditions, WeatherCondition};
use crate::weather::ConditionLookup;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, instrument};

/// Selection loop tuning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionConfig {
    /// Rejections tolerated before the run fails with `SelectionExhausted`
    pub max_retries: u32,
    /// Conditions that reject a candidate in weather-sensitive mode
    pub unfavorable: UnfavorableConditions,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            unfavorable: UnfavorableConditions::default(),
        }
    }
}

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// The accepted candidate
    pub activity: Activity,
    /// Candidates rejected for unfavorable weather, in rejection order
    pub discarded: Vec<Activity>,
    /// Candidates drawn in total, always `discarded.len() + 1`
    pub evaluated: usize,
}

/// Draws candidates until one suits the requested mode
#[derive(Clone)]
pub struct SelectionEngine {
    weather: Arc<dyn ConditionLookup>,
    config: SelectionConfig,
    samplers: Arc<dyn SamplerFactory>,
}

impl SelectionEngine {
    /// Engine with time-seeded uniform sampling
    #[must_use]
    pub fn new(weather: Arc<dyn ConditionLookup>, config: SelectionConfig) -> Self {
        Self::with_sampler_factory(weather, config, Arc::new(TimeSeededSamplers::new()))
    }

    /// Engine with an injected sampler factory
    #[must_use]
    pub fn with_sampler_factory(
        weather: Arc<dyn ConditionLookup>,
        config: SelectionConfig,
        samplers: Arc<dyn SamplerFactory>,
    ) -> Self {
        Self {
            weather,
            config,
            samplers,
        }
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &SelectionConfig {
        &self.config
    }

    /// Pick one candidate for `mode`
    ///
    /// `deadline` bounds the whole run; a lookup still pending when it passes
    /// is abandoned.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` when `candidates` is empty
    /// - `WeatherUnavailable` when a weather lookup fails
    /// - `SelectionExhausted` when more than `max_retries` candidates were
    ///   rejected or every candidate was rejected
    /// - `Cancelled` when the deadline passes
    #[instrument(
        skip(self, candidates, deadline),
        fields(candidates = candidates.len(), mode = %mode)
    )]
    pub async fn select(
        &self,
        candidates: Vec<Activity>,
        mode: SelectionMode,
        deadline: Option<Instant>,
    ) -> Result<Selection, SelectionError> {
        if candidates.is_empty() {
            return Err(SelectionError::InvalidInput(format!(
                "no {mode} activities available"
            )));
        }

        let mut pool = candidates;
        let mut discarded: Vec<Activity> = Vec::new();
        let mut attempts: u32 = 0;
        let mut sampler = self.samplers.start_run();

        loop {
            if attempts > self.config.max_retries || pool.is_empty() {
                debug!(attempts, remaining = pool.len(), "Selection exhausted");
                return Err(SelectionError::SelectionExhausted { attempts });
            }

            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                return Err(SelectionError::Cancelled);
            }

            let index = sampler.next_index(pool.len());
            let Some(candidate) = pool.get(index) else {
                return Err(SelectionError::InvalidInput(format!(
                    "sampled index {index} outside pool of {}",
                    pool.len()
                )));
            };

            if !mode.is_weather_sensitive() {
                return Ok(Self::accept(candidate.clone(), discarded));
            }

            let condition = self.lookup(&candidate.location, deadline).await?;

            if !self.config.unfavorable.contains(&condition) {
                debug!(
                    activity = %candidate.name,
                    location = %candidate.location,
                    %condition,
                    "Accepted candidate"
                );
                return Ok(Self::accept(candidate.clone(), discarded));
            }

            let rejected = pool.remove(index);
            debug!(
                activity = %rejected.name,
                location = %rejected.location,
                %condition,
                attempt = attempts + 1,
                "Rejected candidate for unfavorable weather"
            );
            discarded.push(rejected);
            attempts += 1;
        }
    }

    async fn lookup(
        &self,
        location: &str,
        deadline: Option<Instant>,
    ) -> Result<WeatherCondition, SelectionError> {
        let lookup = self.weather.get_condition(location);
        let result = match deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, lookup)
                .await
                .map_err(|_| SelectionError::Cancelled)?,
            None => lookup.await,
        };
        result.map_err(SelectionError::WeatherUnavailable)
    }

    fn accept(activity: Activity, discarded: Vec<Activity>) -> Selection {
        let evaluated = discarded.len() + 1;
        Selection {
            activity,
            discarded,
            evaluated,
        }
    }
}
