// ABOUTME: User account database operations
// ABOUTME: Registration with unique email/username, lookup, listing, password and avatar updates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use anyhow::Result;
use chrono::Utc;
use serde_json::json;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::{is_unique_violation, parse_timestamp, to_timestamp, Database};
use crate::errors::{AppError, AppResult};
use crate::models::{NewUser, User};
use crate::pagination::PageRequest;

const USER_COLUMNS: &str =
    "id, email, username, first_name, last_name, password_hash, avatar, created_at";

impl Database {
    pub(super) async fn migrate_users(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT NOT NULL UNIQUE,
                username TEXT NOT NULL UNIQUE,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                avatar TEXT,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(self.pool())
        .await?;

        Ok(())
    }
}

/// User account operations
pub struct UsersManager {
    pool: SqlitePool,
}

impl UsersManager {
    /// Create a new users manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new account
    ///
    /// # Errors
    ///
    /// `AlreadyExists` naming the field when the email or username is taken
    pub async fn create(&self, user: &NewUser) -> AppResult<User> {
        let created_at = Utc::now();
        let result = sqlx::query(
            r"
            INSERT INTO users (email, username, first_name, last_name, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.password_hash)
        .bind(to_timestamp(created_at))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                let field = if e.to_string().contains("users.username") {
                    "username"
                } else {
                    "email"
                };
                let message = format!("A user with that {field} already exists");
                AppError::already_exists(message.clone()).with_details(json!({ field: [message] }))
            } else {
                AppError::database(format!("Failed to create user: {e}"))
            }
        })?;

        Ok(User {
            id: result.last_insert_rowid(),
            email: user.email.clone(),
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            password_hash: user.password_hash.clone(),
            avatar: None,
            created_at,
        })
    }

    /// Get a user by ID
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get(&self, id: i64) -> AppResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get user: {e}")))?;

        row.map(|r| Self::row_to_user(&r)).transpose()
    }

    /// Get a user by login email
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get user by email: {e}")))?;

        row.map(|r| Self::row_to_user(&r)).transpose()
    }

    /// One page of users ordered by ID, plus the total count
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list(&self, page: PageRequest) -> AppResult<(Vec<User>, i64)> {
        let rows = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id LIMIT $1 OFFSET $2"
        ))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list users: {e}")))?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count users: {e}")))?;

        let users = rows.iter().map(Self::row_to_user).collect::<AppResult<_>>()?;
        Ok((users, count))
    }

    /// Replace the password hash
    ///
    /// # Errors
    ///
    /// `ResourceNotFound` if the user does not exist
    pub async fn update_password(&self, id: i64, password_hash: &str) -> AppResult<()> {
        let result = sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
            .bind(password_hash)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to update password: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("User"));
        }
        Ok(())
    }

    /// Set or clear the avatar path
    ///
    /// # Errors
    ///
    /// `ResourceNotFound` if the user does not exist
    pub async fn set_avatar(&self, id: i64, avatar: Option<&str>) -> AppResult<()> {
        let result = sqlx::query("UPDATE users SET avatar = $1 WHERE id = $2")
            .bind(avatar)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to update avatar: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("User"));
        }
        Ok(())
    }

    pub(super) fn row_to_user(row: &SqliteRow) -> AppResult<User> {
        let created_at: String = row.get("created_at");
        Ok(User {
            id: row.get("id"),
            email: row.get("email"),
            username: row.get("username"),
            first_name: row.get("first_name"),
            last_name: row.get("last_name"),
            password_hash: row.get("password_hash"),
            avatar: row.get("avatar"),
            created_at: parse_timestamp(&created_at)?,
        })
    }
}
