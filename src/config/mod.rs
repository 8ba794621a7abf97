// ABOUTME: Configuration module for environment-driven server settings
// ABOUTME: Loads, validates and summarizes runtime configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Environment variable parsing and the top-level server configuration
pub mod environment;

pub use environment::{Environment, RedisConnectionConfig, SelectionSettings, ServerConfig};
