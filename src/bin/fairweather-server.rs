// ABOUTME: Server binary for weather-aware activity recommendations
// ABOUTME: Loads configuration, initializes logging and serves the HTTP API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Fairweather Server Binary

use anyhow::Result;
use clap::Parser;
use fairweather_server::{config::ServerConfig, logging, server};
use tracing::info;

/// Command-line overrides applied on top of the environment
#[derive(Parser)]
#[command(name = "fairweather-server")]
#[command(about = "Fairweather - weather-aware leisure activity recommendations")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override database URL
    #[arg(long)]
    database_url: Option<String>,

    /// Do not seed default activities into an empty database
    #[arg(long)]
    no_seed: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(database_url) = args.database_url {
        config.database_url = database_url;
    }
    if args.no_seed {
        config.seed_default_activities = false;
    }
    config.validate()?;

    info!("{}", config.summary());

    server::run(config).await
}
