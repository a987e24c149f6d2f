// ABOUTME: Favorites and shopping cart database operations
// ABOUTME: Constraint-backed add/remove, membership checks and shopping list aggregation queries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use anyhow::Result;
use sqlx::{Row, SqlitePool};

use super::{is_unique_violation, Database};
use crate::errors::{AppError, AppResult};
use crate::models::{CartRecipe, CollectionEntry, RecipeCollection, ShoppingListItem};

impl Database {
    pub(super) async fn migrate_collections(&self) -> Result<()> {
        for collection in [RecipeCollection::Favorites, RecipeCollection::ShoppingCart] {
            let table = collection.table();
            sqlx::query(&format!(
                r"
                CREATE TABLE IF NOT EXISTS {table} (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                    recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                    UNIQUE (user_id, recipe_id)
                )
                "
            ))
            .execute(self.pool())
            .await?;
        }

        Ok(())
    }
}

/// Favorites and shopping cart operations
pub struct CollectionsManager {
    pool: SqlitePool,
}

impl CollectionsManager {
    /// Create a new collections manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a (user, recipe) row
    ///
    /// Duplicates are detected by the `UNIQUE` constraint, not a prior read.
    ///
    /// # Errors
    ///
    /// `AlreadyExists` when the recipe is already in the collection
    pub async fn add(
        &self,
        collection: RecipeCollection,
        user_id: i64,
        recipe_id: i64,
    ) -> AppResult<CollectionEntry> {
        let result = sqlx::query(&format!(
            "INSERT INTO {} (user_id, recipe_id) VALUES ($1, $2)",
            collection.table()
        ))
        .bind(user_id)
        .bind(recipe_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::already_exists(format!("Recipe already added to {collection}"))
            } else {
                AppError::database(format!("Failed to add recipe to {collection}: {e}"))
            }
        })?;

        Ok(CollectionEntry {
            id: result.last_insert_rowid(),
            user_id,
            recipe_id,
        })
    }

    /// Delete exactly one (user, recipe) row
    ///
    /// # Errors
    ///
    /// `RelationNotFound` when the recipe is not in the collection
    pub async fn remove(
        &self,
        collection: RecipeCollection,
        user_id: i64,
        recipe_id: i64,
    ) -> AppResult<()> {
        let result = sqlx::query(&format!(
            "DELETE FROM {} WHERE user_id = $1 AND recipe_id = $2",
            collection.table()
        ))
        .bind(user_id)
        .bind(recipe_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to remove recipe from {collection}: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::relation_not_found(format!(
                "Recipe not present in {collection}"
            )));
        }
        Ok(())
    }

    /// Whether the recipe is in the user's collection
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn contains(
        &self,
        collection: RecipeCollection,
        user_id: i64,
        recipe_id: i64,
    ) -> AppResult<bool> {
        let found: Option<i64> = sqlx::query_scalar(&format!(
            "SELECT id FROM {} WHERE user_id = $1 AND recipe_id = $2",
            collection.table()
        ))
        .bind(user_id)
        .bind(recipe_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to check {collection}: {e}")))?;

        Ok(found.is_some())
    }

    /// Cart ingredient amounts summed per (name, unit), ordered by name then unit
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn shopping_list_items(&self, user_id: i64) -> AppResult<Vec<ShoppingListItem>> {
        let rows = sqlx::query(
            r"
            SELECT i.name AS name, i.measurement_unit AS measurement_unit,
                   SUM(ri.amount) AS total_amount
            FROM shopping_cart sc
            JOIN recipe_ingredients ri ON ri.recipe_id = sc.recipe_id
            JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE sc.user_id = $1
            GROUP BY i.name, i.measurement_unit
            ORDER BY i.name, i.measurement_unit
            ",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to aggregate shopping list: {e}")))?;

        Ok(rows
            .iter()
            .map(|row| ShoppingListItem {
                name: row.get("name"),
                measurement_unit: row.get("measurement_unit"),
                total_amount: row.get("total_amount"),
            })
            .collect())
    }

    /// Recipes in the user's cart in the order they were added
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn cart_recipes(&self, user_id: i64) -> AppResult<Vec<CartRecipe>> {
        let rows = sqlx::query(
            r"
            SELECT r.id AS recipe_id, r.name AS name,
                   u.username AS username, u.first_name AS first_name, u.last_name AS last_name
            FROM shopping_cart sc
            JOIN recipes r ON r.id = sc.recipe_id
            JOIN users u ON u.id = r.author_id
            WHERE sc.user_id = $1
            ORDER BY sc.id
            ",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list cart recipes: {e}")))?;

        Ok(rows
            .iter()
            .map(|row| {
                let first_name: String = row.get("first_name");
                let last_name: String = row.get("last_name");
                let full_name = format!("{} {}", first_name.trim(), last_name.trim());
                let full_name = full_name.trim();
                CartRecipe {
                    recipe_id: row.get("recipe_id"),
                    name: row.get("name"),
                    author_name: if full_name.is_empty() {
                        row.get("username")
                    } else {
                        full_name.to_owned()
                    },
                }
            })
            .collect())
    }
}
