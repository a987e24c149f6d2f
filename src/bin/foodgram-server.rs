// ABOUTME: Foodgram API server binary
// ABOUTME: Loads configuration, opens the database and serves the HTTP API
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! # Foodgram Server Binary
//!
//! Configuration comes from the environment; `--http-port` overrides
//! `HTTP_PORT`.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use foodgram_server::{
    config::environment::ServerConfig, database::Database, logging,
    resources::ServerResources, server::FoodgramServer,
};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "foodgram-server")]
#[command(about = "Foodgram - recipe sharing API server")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    info!("Starting Foodgram server");
    let database = Database::new(&config.database.url).await?;
    info!("Database ready at {}", config.database.url);

    let port = config.http_port;
    let resources = Arc::new(ServerResources::new(database, Arc::new(config)));

    if let Err(e) = FoodgramServer::new(resources).run(port).await {
        error!("Server error: {e:#}");
        return Err(e);
    }
    Ok(())
}
