// ABOUTME: Main library entry point for the Fairweather activity recommendation service
// ABOUTME: Weather-aware activity selection with cache-aside lookups and a guarded provider
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Fairweather Server
//!
//! Recommends a leisure activity, optionally only one whose location
//! currently has favorable weather.
//!
//! ## Request path
//!
//! ```text
//! routes -> service -> store (candidates)
//!                   -> selection engine -> weather cache -> circuit breaker -> classifier
//! ```
//!
//! The selection engine is stateless across calls; every mutable piece of a
//! run (candidate pool, discarded set, attempt counter) lives inside one
//! `SelectionEngine::select` call.

// ── Public API ──────────────────────────────────────────────────────────
// Used by the server binary (src/bin/) and integration tests (tests/).

pub mod cache;

pub mod config;

pub mod logging;

pub mod routes;

pub mod selection;

pub mod server;

pub mod service;

pub mod store;

pub mod weather;

// Re-export core modules so server code can use `crate::errors::*` etc.
pub use fairweather_core::constants;
pub use fairweather_core::errors;
pub use fairweather_core::models;
