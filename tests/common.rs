// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: In-memory database, temporary media root, users, ingredients and recipes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `foodgram_server`

use std::sync::{Arc, Once};

use anyhow::Result;
use foodgram_server::{
    config::environment::{AuthConfig, MediaConfig, ServerConfig},
    database::Database,
    media::{ImageUpload, MediaStore},
    models::{Ingredient, IngredientAmount, NewIngredient, NewUser, Recipe, RecipeDraft, User},
    resources::ServerResources,
    services::recipes::create_recipe,
};
use tempfile::TempDir;

static INIT_LOGGER: Once = Once::new();

/// 1x1 transparent PNG
pub const PNG_DATA_URI: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

/// Base URL used by test configurations
pub const TEST_BASE_URL: &str = "http://testserver";

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// Standard test database setup
pub async fn create_test_database() -> Result<Database> {
    init_test_logging();
    Database::new("sqlite::memory:").await
}

/// Configuration pointing media at `media_root`
pub fn test_config(media_root: &TempDir) -> ServerConfig {
    ServerConfig {
        base_url: TEST_BASE_URL.to_owned(),
        auth: AuthConfig {
            jwt_secret: Some("test-secret-that-is-long-enough-for-hs256".to_owned()),
            bcrypt_cost: 4,
            ..AuthConfig::default()
        },
        media: MediaConfig {
            root: media_root.path().to_path_buf(),
            ..MediaConfig::default()
        },
        ..ServerConfig::default()
    }
}

/// Media store writing into a temporary directory
pub fn create_test_media() -> (MediaStore, TempDir) {
    let dir = TempDir::new().unwrap();
    let store = MediaStore::new(&test_config(&dir).media);
    (store, dir)
}

/// Complete resources; keep the `TempDir` alive for the test's duration
pub async fn create_test_resources() -> Result<(Arc<ServerResources>, TempDir)> {
    let database = create_test_database().await?;
    let dir = TempDir::new()?;
    let config = Arc::new(test_config(&dir));
    Ok((Arc::new(ServerResources::new(database, config)), dir))
}

/// Insert a user with a placeholder password hash
pub async fn create_test_user(database: &Database, username: &str) -> Result<User> {
    let user = database
        .users()
        .create(&NewUser {
            email: format!("{username}@example.com"),
            username: username.to_owned(),
            first_name: "Test".to_owned(),
            last_name: "Cook".to_owned(),
            password_hash: "not-a-real-hash".to_owned(),
        })
        .await?;
    Ok(user)
}

/// Insert a catalogue ingredient
pub async fn create_test_ingredient(
    database: &Database,
    name: &str,
    measurement_unit: &str,
) -> Result<Ingredient> {
    let ingredient = database
        .ingredients()
        .create(&NewIngredient {
            name: name.to_owned(),
            measurement_unit: measurement_unit.to_owned(),
        })
        .await?;
    Ok(ingredient)
}

/// Decoded test image
pub fn test_image() -> ImageUpload {
    ImageUpload::from_data_uri("image", PNG_DATA_URI).unwrap()
}

/// Create a recipe through the service layer
pub async fn create_test_recipe(
    database: &Database,
    media: &MediaStore,
    author: &User,
    name: &str,
    lines: &[(i64, i64)],
) -> Result<Recipe> {
    let draft = RecipeDraft {
        name: name.to_owned(),
        text: format!("How to cook {name}"),
        cooking_time: 10,
        image: Some(test_image()),
        ingredients: lines
            .iter()
            .map(|&(id, amount)| IngredientAmount { id, amount })
            .collect(),
    };
    Ok(create_recipe(database, media, author.id, draft).await?)
}
