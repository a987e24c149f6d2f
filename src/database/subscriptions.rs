// ABOUTME: Subscription (follow) database operations
// ABOUTME: Constraint-backed follow/unfollow, membership checks and followed-author listing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use anyhow::Result;
use sqlx::{Row, SqlitePool};

use super::{is_unique_violation, Database, UsersManager};
use crate::errors::{AppError, AppResult};
use crate::models::{FollowedAuthor, Subscription};
use crate::pagination::PageRequest;

impl Database {
    pub(super) async fn migrate_subscriptions(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS subscriptions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                author_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                UNIQUE (user_id, author_id),
                CHECK (user_id != author_id)
            )
            ",
        )
        .execute(self.pool())
        .await?;

        Ok(())
    }
}

/// Follow relation operations
pub struct SubscriptionsManager {
    pool: SqlitePool,
}

impl SubscriptionsManager {
    /// Create a new subscriptions manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a (follower, author) row
    ///
    /// # Errors
    ///
    /// `AlreadyExists` when the pair is present
    pub async fn create(&self, user_id: i64, author_id: i64) -> AppResult<Subscription> {
        let result = sqlx::query("INSERT INTO subscriptions (user_id, author_id) VALUES ($1, $2)")
            .bind(user_id)
            .bind(author_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::already_exists("Already subscribed to this author")
                } else {
                    AppError::database(format!("Failed to create subscription: {e}"))
                }
            })?;

        Ok(Subscription {
            id: result.last_insert_rowid(),
            user_id,
            author_id,
        })
    }

    /// Delete a (follower, author) row
    ///
    /// # Errors
    ///
    /// `RelationNotFound` when the pair is absent
    pub async fn delete(&self, user_id: i64, author_id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM subscriptions WHERE user_id = $1 AND author_id = $2")
            .bind(user_id)
            .bind(author_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete subscription: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::relation_not_found("Not subscribed to this author"));
        }
        Ok(())
    }

    /// Whether `user_id` follows `author_id`
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn exists(&self, user_id: i64, author_id: i64) -> AppResult<bool> {
        let found: Option<i64> =
            sqlx::query_scalar("SELECT id FROM subscriptions WHERE user_id = $1 AND author_id = $2")
                .bind(user_id)
                .bind(author_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to check subscription: {e}")))?;

        Ok(found.is_some())
    }

    /// One page of followed authors with their recipe counts, in follow order
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_followed(
        &self,
        user_id: i64,
        page: PageRequest,
    ) -> AppResult<(Vec<FollowedAuthor>, i64)> {
        let rows = sqlx::query(
            r"
            SELECT u.id, u.email, u.username, u.first_name, u.last_name, u.password_hash,
                   u.avatar, u.created_at,
                   (SELECT COUNT(*) FROM recipes r WHERE r.author_id = u.id) AS recipes_count
            FROM subscriptions s
            JOIN users u ON u.id = s.author_id
            WHERE s.user_id = $1
            ORDER BY s.id
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(user_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list subscriptions: {e}")))?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM subscriptions WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count subscriptions: {e}")))?;

        let authors = rows
            .iter()
            .map(|row| {
                Ok(FollowedAuthor {
                    author: UsersManager::row_to_user(row)?,
                    recipes_count: row.get("recipes_count"),
                })
            })
            .collect::<AppResult<_>>()?;

        Ok((authors, count))
    }
}
