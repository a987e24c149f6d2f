// ABOUTME: Command-line ingredient catalogue loader
// ABOUTME: Imports {name, measurement_unit} records from a JSON file, skipping stored pairs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use foodgram_server::{
    config::environment::IngredientLoaderConfig,
    constants::service_names::INGREDIENT_LOADER,
    database::Database,
    logging::LoggingConfig,
    services::ingredient_import::import_ingredients,
};

#[derive(Parser)]
#[command(name = "load-ingredients")]
#[command(about = "Load the ingredient catalogue from a JSON file")]
struct Args {
    /// JSON file to import (defaults to `INGREDIENTS_FILE`)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Database URL (defaults to `DATABASE_URL`)
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    LoggingConfig::from_env()
        .with_service_name(INGREDIENT_LOADER)
        .init()?;

    let config = IngredientLoaderConfig::from_env();
    let file = args.file.unwrap_or(config.ingredients_file);
    let database_url = args.database_url.unwrap_or(config.database.url);

    let database = Database::new(&database_url).await?;
    let outcome = import_ingredients(&database, &file).await;
    println!("{outcome}");

    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
