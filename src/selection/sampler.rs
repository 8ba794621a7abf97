// ABOUTME: Index samplers used by the selection loop to draw candidates
// ABOUTME: Time-seeded uniform sampling by default, scripted sequences for deterministic runs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Draws candidate indices for one selection run
pub trait Sampler: Send {
    /// Index in `[0, len)`; `len` is never zero
    fn next_index(&mut self, len: usize) -> usize;
}

/// Creates a fresh sampler for each selection run
pub trait SamplerFactory: Send + Sync {
    /// Sampler owned by a single run
    fn start_run(&self) -> Box<dyn Sampler>;
}

/// Uniform sampler backed by a seeded `StdRng`
pub struct UniformSampler {
    rng: StdRng,
}

impl UniformSampler {
    /// Sampler with an explicit seed
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Sampler for UniformSampler {
    fn next_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Seeds each run from the wall clock
///
/// A per-factory counter is mixed into the seed so runs started within the
/// same clock tick still draw different sequences.
#[derive(Debug, Default)]
pub struct TimeSeededSamplers {
    runs: AtomicU64,
}

impl TimeSeededSamplers {
    /// Create a new factory
    #[must_use]
    pub const fn new() -> Self {
        Self {
            runs: AtomicU64::new(0),
        }
    }
}

impl SamplerFactory for TimeSeededSamplers {
    fn start_run(&self) -> Box<dyn Sampler> {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_nanos() as u64);
        let run = self.runs.fetch_add(1, Ordering::Relaxed);
        Box::new(UniformSampler::from_seed(
            nanos ^ run.wrapping_mul(0x9E37_79B9_7F4A_7C15),
        ))
    }
}

/// Replays a fixed index sequence, wrapping each value into range
///
/// Every run starts from the beginning of the script; once exhausted the
/// sampler keeps returning index 0.
#[derive(Debug, Clone)]
pub struct ScriptedSamplers {
    script: Vec<usize>,
}

impl ScriptedSamplers {
    /// Factory replaying `script` for every run
    #[must_use]
    pub const fn new(script: Vec<usize>) -> Self {
        Self { script }
    }
}

impl SamplerFactory for ScriptedSamplers {
    fn start_run(&self) -> Box<dyn Sampler> {
        Box::new(ScriptedSampler {
            script: self.script.clone().into_iter(),
        })
    }
}

struct ScriptedSampler {
    script: std::vec::IntoIter<usize>,
}

impl Sampler for ScriptedSampler {
    fn next_index(&mut self, len: usize) -> usize {
        self.script.next().map_or(0, |index| index % len)
    }
}
