// ABOUTME: Recipe database operations with transactional ingredient line replacement
// ABOUTME: Create/update/delete recipes, read lines, and filtered newest-first listing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use std::collections::HashSet;

use anyhow::Result;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqliteConnection, SqlitePool};

use super::{parse_timestamp, to_timestamp, Database};
use crate::errors::{AppError, AppResult};
use crate::models::{IngredientAmount, Recipe, RecipeIngredientLine};
use crate::pagination::PageRequest;

const RECIPE_COLUMNS: &str = "r.id, r.author_id, r.name, r.text, r.cooking_time, r.image, r.created_at";

impl Database {
    pub(super) async fn migrate_recipes(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS recipes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                author_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                text TEXT NOT NULL,
                cooking_time INTEGER NOT NULL CHECK (cooking_time >= 1),
                image TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(self.pool())
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS recipe_ingredients (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                ingredient_id INTEGER NOT NULL REFERENCES ingredients(id) ON DELETE CASCADE,
                amount INTEGER NOT NULL CHECK (amount >= 1),
                UNIQUE (recipe_id, ingredient_id)
            )
            ",
        )
        .execute(self.pool())
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_recipes_author ON recipes(author_id)")
            .execute(self.pool())
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_recipes_created ON recipes(created_at)")
            .execute(self.pool())
            .await?;

        Ok(())
    }
}

/// Scalar recipe fields as written to the `recipes` table
#[derive(Debug, Clone)]
pub struct RecipeRecord {
    /// Title
    pub name: String,
    /// Description
    pub text: String,
    /// Minutes
    pub cooking_time: i64,
    /// Media path of the picture
    pub image: String,
}

/// Recipe list filters; unset fields do not constrain
#[derive(Debug, Clone, Copy, Default)]
pub struct RecipeFilter {
    /// Only recipes by this author
    pub author_id: Option<i64>,
    /// Only recipes this user favorited
    pub favorited_by: Option<i64>,
    /// Only recipes in this user's cart
    pub in_cart_of: Option<i64>,
}

impl RecipeFilter {
    fn push_where(&self, builder: &mut QueryBuilder<'_, Sqlite>) {
        builder.push(" WHERE 1 = 1");
        if let Some(author_id) = self.author_id {
            builder.push(" AND r.author_id = ").push_bind(author_id);
        }
        if let Some(user_id) = self.favorited_by {
            builder
                .push(" AND EXISTS (SELECT 1 FROM favorites f WHERE f.recipe_id = r.id AND f.user_id = ")
                .push_bind(user_id)
                .push(")");
        }
        if let Some(user_id) = self.in_cart_of {
            builder
                .push(" AND EXISTS (SELECT 1 FROM shopping_cart c WHERE c.recipe_id = r.id AND c.user_id = ")
                .push_bind(user_id)
                .push(")");
        }
    }
}

/// Recipe operations
pub struct RecipesManager {
    pool: SqlitePool,
}

impl RecipesManager {
    /// Create a new recipes manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a recipe and its lines in one transaction
    ///
    /// # Errors
    ///
    /// `InvalidInput` naming unknown ingredient IDs; database errors roll back
    /// every write
    pub async fn create(
        &self,
        author_id: i64,
        record: &RecipeRecord,
        lines: &[IngredientAmount],
    ) -> AppResult<Recipe> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        Self::ensure_ingredients_exist(&mut *tx, lines).await?;

        let created_at = Utc::now();
        let result = sqlx::query(
            r"
            INSERT INTO recipes (author_id, name, text, cooking_time, image, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(author_id)
        .bind(&record.name)
        .bind(&record.text)
        .bind(record.cooking_time)
        .bind(&record.image)
        .bind(to_timestamp(created_at))
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to create recipe: {e}")))?;

        let recipe_id = result.last_insert_rowid();
        Self::insert_lines(&mut *tx, recipe_id, lines).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit recipe: {e}")))?;

        Ok(Recipe {
            id: recipe_id,
            author_id,
            name: record.name.clone(),
            text: record.text.clone(),
            cooking_time: record.cooking_time,
            image: record.image.clone(),
            created_at,
        })
    }

    /// Overwrite recipe fields and replace every line in one transaction
    ///
    /// Existing lines are always deleted and the new set inserted, so line
    /// IDs change on every update.
    ///
    /// # Errors
    ///
    /// `ResourceNotFound` if the recipe vanished, `InvalidInput` naming unknown
    /// ingredient IDs; nothing is written on failure
    pub async fn update(
        &self,
        recipe_id: i64,
        record: &RecipeRecord,
        lines: &[IngredientAmount],
    ) -> AppResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        Self::ensure_ingredients_exist(&mut *tx, lines).await?;

        let result = sqlx::query(
            r"
            UPDATE recipes
            SET name = $1, text = $2, cooking_time = $3, image = $4
            WHERE id = $5
            ",
        )
        .bind(&record.name)
        .bind(&record.text)
        .bind(record.cooking_time)
        .bind(&record.image)
        .bind(recipe_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to update recipe: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Recipe"));
        }

        sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
            .bind(recipe_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to clear recipe lines: {e}")))?;

        Self::insert_lines(&mut *tx, recipe_id, lines).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit recipe: {e}")))?;

        Ok(())
    }

    /// Delete a recipe; lines, favorites and cart rows cascade
    ///
    /// # Errors
    ///
    /// `ResourceNotFound` if no such recipe exists
    pub async fn delete(&self, recipe_id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(recipe_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete recipe: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Recipe"));
        }
        Ok(())
    }

    /// Get a recipe by ID
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get(&self, recipe_id: i64) -> AppResult<Option<Recipe>> {
        let row = sqlx::query(&format!("SELECT {RECIPE_COLUMNS} FROM recipes r WHERE r.id = $1"))
            .bind(recipe_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get recipe: {e}")))?;

        row.map(|r| Self::row_to_recipe(&r)).transpose()
    }

    /// Whether a recipe exists
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn exists(&self, recipe_id: i64) -> AppResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM recipes WHERE id = $1")
            .bind(recipe_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to look up recipe: {e}")))?;
        Ok(found.is_some())
    }

    /// Lines of a recipe joined with their ingredients, in insertion order
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn lines(&self, recipe_id: i64) -> AppResult<Vec<RecipeIngredientLine>> {
        let rows = sqlx::query(
            r"
            SELECT i.id, i.name, i.measurement_unit, ri.amount
            FROM recipe_ingredients ri
            JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE ri.recipe_id = $1
            ORDER BY ri.id
            ",
        )
        .bind(recipe_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get recipe lines: {e}")))?;

        Ok(rows
            .iter()
            .map(|row| RecipeIngredientLine {
                id: row.get("id"),
                name: row.get("name"),
                measurement_unit: row.get("measurement_unit"),
                amount: row.get("amount"),
            })
            .collect())
    }

    /// One page of recipes matching the filter, newest first, plus the total count
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list(
        &self,
        filter: &RecipeFilter,
        page: PageRequest,
    ) -> AppResult<(Vec<Recipe>, i64)> {
        let mut count_query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM recipes r");
        filter.push_where(&mut count_query);
        let count: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count recipes: {e}")))?;

        let mut query = QueryBuilder::<Sqlite>::new(format!("SELECT {RECIPE_COLUMNS} FROM recipes r"));
        filter.push_where(&mut query);
        query
            .push(" ORDER BY r.created_at DESC, r.id DESC LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list recipes: {e}")))?;

        let recipes = rows.iter().map(Self::row_to_recipe).collect::<AppResult<_>>()?;
        Ok((recipes, count))
    }

    /// Newest recipes by an author, optionally capped
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn by_author(&self, author_id: i64, limit: Option<i64>) -> AppResult<Vec<Recipe>> {
        // SQLite treats a negative LIMIT as unbounded
        let rows = sqlx::query(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes r WHERE r.author_id = $1 \
             ORDER BY r.created_at DESC, r.id DESC LIMIT $2"
        ))
        .bind(author_id)
        .bind(limit.unwrap_or(-1))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list author recipes: {e}")))?;

        rows.iter().map(Self::row_to_recipe).collect()
    }

    async fn ensure_ingredients_exist(
        conn: &mut SqliteConnection,
        lines: &[IngredientAmount],
    ) -> AppResult<()> {
        if lines.is_empty() {
            return Ok(());
        }

        let mut query = QueryBuilder::<Sqlite>::new("SELECT id FROM ingredients WHERE id IN (");
        let mut separated = query.separated(", ");
        for line in lines {
            separated.push_bind(line.id);
        }
        separated.push_unseparated(")");

        let found: HashSet<i64> = query
            .build_query_scalar::<i64>()
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| AppError::database(format!("Failed to check ingredients: {e}")))?
            .into_iter()
            .collect();

        let missing: Vec<String> = lines
            .iter()
            .filter(|line| !found.contains(&line.id))
            .map(|line| line.id.to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::invalid_field(
                "ingredients",
                format!("unknown ingredient id: {}", missing.join(", ")),
            ))
        }
    }

    async fn insert_lines(
        conn: &mut SqliteConnection,
        recipe_id: i64,
        lines: &[IngredientAmount],
    ) -> AppResult<()> {
        for line in lines {
            sqlx::query(
                "INSERT INTO recipe_ingredients (recipe_id, ingredient_id, amount) VALUES ($1, $2, $3)",
            )
            .bind(recipe_id)
            .bind(line.id)
            .bind(line.amount)
            .execute(&mut *conn)
            .await
            .map_err(|e| AppError::database(format!("Failed to insert recipe line: {e}")))?;
        }
        Ok(())
    }

    fn row_to_recipe(row: &SqliteRow) -> AppResult<Recipe> {
        let created_at: String = row.get("created_at");
        Ok(Recipe {
            id: row.get("id"),
            author_id: row.get("author_id"),
            name: row.get("name"),
            text: row.get("text"),
            cooking_time: row.get("cooking_time"),
            image: row.get("image"),
            created_at: parse_timestamp(&created_at)?,
        })
    }
}
