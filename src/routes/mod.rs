// ABOUTME: Route module organization for the recipe API HTTP endpoints
// ABOUTME: Shared authentication helpers and JSON representations used by every route group
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! Route module
//!
//! Routes are organized by domain. Each domain module contains only route
//! definitions and thin handler functions that delegate to the service layer.

/// Token login and logout
pub mod auth;
/// Health check
pub mod health;
/// Ingredient catalogue
pub mod ingredients;
/// Recipes, favorites, shopping cart and short links
pub mod recipes;
/// Short-link redirects
pub mod short_links;
/// Accounts, avatars and subscriptions
pub mod users;

pub use auth::AuthRoutes;
pub use health::HealthRoutes;
pub use ingredients::IngredientRoutes;
pub use recipes::RecipeRoutes;
pub use short_links::ShortLinkRoutes;
pub use users::UserRoutes;

use std::sync::Arc;

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};

use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::media::MediaStore;
use crate::models::{Recipe, User};
use crate::resources::ServerResources;

/// Resolve the caller from the `Authorization` header, which must be present
///
/// # Errors
///
/// `AuthRequired` without a header, `AuthInvalid` for a bad token or a
/// deleted account
pub async fn require_user(headers: &HeaderMap, resources: &Arc<ServerResources>) -> AppResult<User> {
    optional_user(headers, resources)
        .await?
        .ok_or_else(AppError::auth_required)
}

/// Resolve the caller if an `Authorization` header is present
///
/// # Errors
///
/// `AuthInvalid` for a bad token or a deleted account
pub async fn optional_user(
    headers: &HeaderMap,
    resources: &Arc<ServerResources>,
) -> AppResult<Option<User>> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| AppError::auth_invalid("Authorization header is not valid text"))?;

    let user_id = resources.auth_manager.authenticate_header(value)?;
    resources
        .database
        .users()
        .get(user_id)
        .await?
        .map(Some)
        .ok_or_else(|| AppError::auth_invalid("User no longer exists"))
}

/// Public user representation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    /// Email
    pub email: String,
    /// User ID
    pub id: i64,
    /// Username
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Whether the caller follows this user
    pub is_subscribed: bool,
    /// Absolute avatar URL
    pub avatar: Option<String>,
}

impl UserResponse {
    /// Build the representation; `is_subscribed` is relative to the caller
    #[must_use]
    pub fn new(user: &User, is_subscribed: bool, base_url: &str) -> Self {
        Self {
            email: user.email.clone(),
            id: user.id,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            is_subscribed,
            avatar: user
                .avatar
                .as_deref()
                .map(|path| MediaStore::url_for(base_url, path)),
        }
    }

    /// Build the representation, looking up whether `viewer` follows `user`
    ///
    /// # Errors
    ///
    /// Database failures
    pub async fn for_viewer(
        database: &Database,
        user: &User,
        viewer: Option<&User>,
        base_url: &str,
    ) -> AppResult<Self> {
        let is_subscribed = match viewer {
            Some(viewer) => database.subscriptions().exists(viewer.id, user.id).await?,
            None => false,
        };
        Ok(Self::new(user, is_subscribed, base_url))
    }
}

/// Compact recipe representation used by collections and subscriptions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeShortResponse {
    /// Recipe ID
    pub id: i64,
    /// Title
    pub name: String,
    /// Absolute image URL
    pub image: String,
    /// Minutes
    pub cooking_time: i64,
}

impl RecipeShortResponse {
    /// Build the representation
    #[must_use]
    pub fn new(recipe: &Recipe, base_url: &str) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name.clone(),
            image: MediaStore::url_for(base_url, &recipe.image),
            cooking_time: recipe.cooking_time,
        }
    }
}
