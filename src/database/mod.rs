// ABOUTME: SQLite storage for users, ingredients, recipes and user-scoped relations
// ABOUTME: Owns the connection pool, runs schema migrations and hands out per-domain managers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! # Database Management
//!
//! One `SqlitePool` shared by per-domain managers. Each manager wraps a clone
//! of the pool and maps `sqlx` failures into [`AppError`]. Uniqueness rules
//! (collection rows, subscriptions, user email and username) are enforced by
//! `UNIQUE` constraints so concurrent duplicate requests cannot both succeed.

mod collections;
mod ingredients;
mod recipes;
mod subscriptions;
mod users;

pub use collections::CollectionsManager;
pub use ingredients::IngredientsManager;
pub use recipes::{RecipeFilter, RecipeRecord, RecipesManager};
pub use subscriptions::SubscriptionsManager;
pub use users::UsersManager;

use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

use crate::errors::{AppError, AppResult};

/// Database handle for all recipe data
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect and run migrations
    ///
    /// `sqlite::memory:` gets a single long-lived connection so every query
    /// sees the same in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid, the file cannot be created or a
    /// migration fails
    pub async fn new(database_url: &str) -> Result<Self> {
        let in_memory = database_url.contains(":memory:");
        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("Invalid database URL: {database_url}"))?
            .create_if_missing(true)
            .foreign_keys(true);

        if !in_memory {
            if let Some(parent) = options.get_filename().parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create database directory {}", parent.display())
                    })?;
                }
            }
        }

        let pool = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(8)
                .connect_with(options)
                .await?
        };

        let db = Self { pool };
        db.migrate().await?;
        info!(url = %database_url, "Database ready");
        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if any `CREATE` statement fails
    pub async fn migrate(&self) -> Result<()> {
        self.migrate_users().await?;
        self.migrate_ingredients().await?;
        self.migrate_recipes().await?;
        self.migrate_collections().await?;
        self.migrate_subscriptions().await?;
        Ok(())
    }

    /// User accounts
    #[must_use]
    pub fn users(&self) -> UsersManager {
        UsersManager::new(self.pool.clone())
    }

    /// Ingredient catalogue
    #[must_use]
    pub fn ingredients(&self) -> IngredientsManager {
        IngredientsManager::new(self.pool.clone())
    }

    /// Recipes and their lines
    #[must_use]
    pub fn recipes(&self) -> RecipesManager {
        RecipesManager::new(self.pool.clone())
    }

    /// Favorites and shopping cart
    #[must_use]
    pub fn collections(&self) -> CollectionsManager {
        CollectionsManager::new(self.pool.clone())
    }

    /// Follow relations
    #[must_use]
    pub fn subscriptions(&self) -> SubscriptionsManager {
        SubscriptionsManager::new(self.pool.clone())
    }
}

/// True when the error is a `UNIQUE` constraint violation
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}

/// Fixed-width RFC 3339 so text ordering matches time ordering
pub(crate) fn to_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_timestamp(value: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::database(format!("Invalid timestamp {value}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let db = Database::new("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();

        let tables: Vec<(String,)> =
            sqlx::query_as("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
                .fetch_all(db.pool())
                .await
                .unwrap();
        let names: Vec<&str> = tables.iter().map(|(name,)| name.as_str()).collect();
        for expected in [
            "favorites",
            "ingredients",
            "recipe_ingredients",
            "recipes",
            "shopping_cart",
            "subscriptions",
            "users",
        ] {
            assert!(names.contains(&expected), "missing table {expected}");
        }
    }

    #[test]
    fn test_timestamps_sort_lexicographically() {
        let earlier = to_timestamp(DateTime::from_timestamp(1_700_000_000, 0).unwrap());
        let later = to_timestamp(DateTime::from_timestamp(1_700_000_000, 500_000).unwrap());
        assert!(earlier < later);
        assert_eq!(parse_timestamp(&later).unwrap().timestamp_subsec_micros(), 500);
    }
}
