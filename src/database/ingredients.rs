// ABOUTME: Ingredient catalogue database operations
// ABOUTME: Prefix search, lookup by ID, existing (name, unit) pairs and batch insert for imports
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use std::collections::HashSet;

use anyhow::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{Ingredient, NewIngredient};

impl Database {
    pub(super) async fn migrate_ingredients(&self) -> Result<()> {
        // (name, measurement_unit) is deduplicated by the importer, not the schema
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS ingredients (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                measurement_unit TEXT NOT NULL
            )
            ",
        )
        .execute(self.pool())
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_ingredients_name ON ingredients(name)")
            .execute(self.pool())
            .await?;

        Ok(())
    }
}

/// Ingredient catalogue operations
pub struct IngredientsManager {
    pool: SqlitePool,
}

impl IngredientsManager {
    /// Create a new ingredients manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Ingredients ordered by name, optionally filtered by case-insensitive name prefix
    ///
    /// The prefix match runs in Rust so non-ASCII names fold case correctly.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list(&self, name_prefix: Option<&str>) -> AppResult<Vec<Ingredient>> {
        let rows = sqlx::query(
            "SELECT id, name, measurement_unit FROM ingredients ORDER BY name, measurement_unit, id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list ingredients: {e}")))?;

        let prefix = name_prefix
            .map(|p| p.trim().to_lowercase())
            .filter(|p| !p.is_empty());

        Ok(rows
            .iter()
            .map(Self::row_to_ingredient)
            .filter(|ingredient| {
                prefix
                    .as_deref()
                    .is_none_or(|p| ingredient.name.to_lowercase().starts_with(p))
            })
            .collect())
    }

    /// Get an ingredient by ID
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get(&self, id: i64) -> AppResult<Option<Ingredient>> {
        let row = sqlx::query("SELECT id, name, measurement_unit FROM ingredients WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get ingredient: {e}")))?;

        Ok(row.as_ref().map(Self::row_to_ingredient))
    }

    /// Insert a single ingredient
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn create(&self, ingredient: &NewIngredient) -> AppResult<Ingredient> {
        let result =
            sqlx::query("INSERT INTO ingredients (name, measurement_unit) VALUES ($1, $2)")
                .bind(&ingredient.name)
                .bind(&ingredient.measurement_unit)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to create ingredient: {e}")))?;

        Ok(Ingredient {
            id: result.last_insert_rowid(),
            name: ingredient.name.clone(),
            measurement_unit: ingredient.measurement_unit.clone(),
        })
    }

    /// Every stored (name, measurement unit) pair
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn existing_pairs(&self) -> AppResult<HashSet<(String, String)>> {
        let rows: Vec<(String, String)> =
            sqlx::query_as("SELECT name, measurement_unit FROM ingredients")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to read ingredients: {e}")))?;

        Ok(rows.into_iter().collect())
    }

    /// Insert all ingredients in one transaction
    ///
    /// # Errors
    ///
    /// Returns an error and inserts nothing if any insert fails
    pub async fn insert_many(&self, ingredients: &[NewIngredient]) -> AppResult<usize> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        for ingredient in ingredients {
            sqlx::query("INSERT INTO ingredients (name, measurement_unit) VALUES ($1, $2)")
                .bind(&ingredient.name)
                .bind(&ingredient.measurement_unit)
                .execute(&mut *tx)
                .await
                .map_err(|e| AppError::database(format!("Failed to insert ingredient: {e}")))?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit ingredients: {e}")))?;

        Ok(ingredients.len())
    }

    fn row_to_ingredient(row: &SqliteRow) -> Ingredient {
        Ingredient {
            id: row.get("id"),
            name: row.get("name"),
            measurement_unit: row.get("measurement_unit"),
        }
    }
}
