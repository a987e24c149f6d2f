// ABOUTME: User account route handlers: registration, profiles, avatars and subscriptions
// ABOUTME: Thin handlers delegating to the user and subscription services
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::{optional_user, require_user, RecipeShortResponse, UserResponse};
use crate::errors::AppError;
use crate::media::{ImageUpload, MediaStore};
use crate::models::{Recipe, User};
use crate::pagination::{Page, PageParams};
use crate::resources::ServerResources;
use crate::services::subscriptions::{self, AuthorWithRecipes};
use crate::services::users::{self, Registration};

/// Response for a new account; the password is never echoed
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisteredUserResponse {
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
}

impl From<User> for RegisteredUserResponse {
    fn from(user: User) -> Self {
        Self {
            email: user.email,
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}

/// Avatar upload body
#[derive(Debug, Deserialize)]
pub struct AvatarRequest {
    /// Base64 data URI
    pub avatar: Option<String>,
}

/// Avatar upload response
#[derive(Debug, Serialize, Deserialize)]
pub struct AvatarResponse {
    /// Absolute avatar URL
    pub avatar: String,
}

/// Password change body
#[derive(Debug, Deserialize)]
pub struct SetPasswordRequest {
    /// Current password
    pub current_password: String,
    /// Replacement password
    pub new_password: String,
}

/// Query for the subscription list
#[derive(Debug, Default, Deserialize)]
pub struct SubscriptionsQuery {
    /// 1-based page number
    pub page: Option<u32>,
    /// Page size
    pub limit: Option<u32>,
    /// Recipes shown per author
    pub recipes_limit: Option<i64>,
}

/// Query for subscribing
#[derive(Debug, Default, Deserialize)]
pub struct SubscribeQuery {
    /// Recipes shown for the author
    pub recipes_limit: Option<i64>,
}

/// A followed author with a recipe preview
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthorResponse {
    /// Author representation
    #[serde(flatten)]
    pub user: UserResponse,
    /// Newest recipes
    pub recipes: Vec<RecipeShortResponse>,
    /// Total recipes by the author
    pub recipes_count: i64,
}

impl AuthorResponse {
    fn new(author: &User, recipes: &[Recipe], recipes_count: i64, base_url: &str) -> Self {
        Self {
            user: UserResponse::new(author, true, base_url),
            recipes: recipes
                .iter()
                .map(|recipe| RecipeShortResponse::new(recipe, base_url))
                .collect(),
            recipes_count,
        }
    }
}

impl From<(AuthorWithRecipes, &str)> for AuthorResponse {
    fn from((entry, base_url): (AuthorWithRecipes, &str)) -> Self {
        Self::new(
            &entry.followed.author,
            &entry.recipes,
            entry.followed.recipes_count,
            base_url,
        )
    }
}

/// User routes implementation
pub struct UserRoutes;

impl UserRoutes {
    /// Create all user routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/users/",
                get(Self::handle_list).post(Self::handle_register),
            )
            .route("/api/users/me/", get(Self::handle_me))
            .route(
                "/api/users/me/avatar/",
                put(Self::handle_set_avatar).delete(Self::handle_delete_avatar),
            )
            .route("/api/users/set_password/", post(Self::handle_set_password))
            .route("/api/users/subscriptions/", get(Self::handle_subscriptions))
            .route("/api/users/:id/", get(Self::handle_get))
            .route(
                "/api/users/:id/subscribe/",
                post(Self::handle_subscribe).delete(Self::handle_unsubscribe),
            )
            .with_state(resources)
    }

    /// Handle POST /api/users/
    async fn handle_register(
        State(resources): State<Arc<ServerResources>>,
        Json(registration): Json<Registration>,
    ) -> Result<Response, AppError> {
        let user =
            users::register(&resources.database, &resources.auth_manager, registration).await?;
        Ok((StatusCode::CREATED, Json(RegisteredUserResponse::from(user))).into_response())
    }

    /// Handle GET /api/users/
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(params): Query<PageParams>,
    ) -> Result<Response, AppError> {
        let viewer = optional_user(&headers, &resources).await?;
        let request = params.resolve(resources.config.page_size);
        let base_url = &resources.config.base_url;

        let (accounts, count) = resources.database.users().list(request).await?;
        let mut results = Vec::with_capacity(accounts.len());
        for account in &accounts {
            results.push(
                UserResponse::for_viewer(&resources.database, account, viewer.as_ref(), base_url)
                    .await?,
            );
        }

        let page = Page::new(results, count, request, &format!("{base_url}/api/users/"));
        Ok((StatusCode::OK, Json(page)).into_response())
    }

    /// Handle GET /api/users/:id/
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let viewer = optional_user(&headers, &resources).await?;
        let user = resources
            .database
            .users()
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        let body = UserResponse::for_viewer(
            &resources.database,
            &user,
            viewer.as_ref(),
            &resources.config.base_url,
        )
        .await?;
        Ok((StatusCode::OK, Json(body)).into_response())
    }

    /// Handle GET /api/users/me/
    async fn handle_me(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = require_user(&headers, &resources).await?;
        let body = UserResponse::new(&user, false, &resources.config.base_url);
        Ok((StatusCode::OK, Json(body)).into_response())
    }

    /// Handle PUT /api/users/me/avatar/
    async fn handle_set_avatar(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<AvatarRequest>,
    ) -> Result<Response, AppError> {
        let user = require_user(&headers, &resources).await?;
        let value = body
            .avatar
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| AppError::missing_field("avatar", "this field is required"))?;
        let upload = ImageUpload::from_data_uri("avatar", &value)?;

        let path = users::set_avatar(&resources.database, &resources.media, &user, &upload).await?;
        let avatar = MediaStore::url_for(&resources.config.base_url, &path);
        Ok((StatusCode::OK, Json(AvatarResponse { avatar })).into_response())
    }

    /// Handle DELETE /api/users/me/avatar/
    async fn handle_delete_avatar(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = require_user(&headers, &resources).await?;
        users::delete_avatar(&resources.database, &resources.media, &user).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    /// Handle POST /api/users/set_password/
    async fn handle_set_password(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<SetPasswordRequest>,
    ) -> Result<Response, AppError> {
        let user = require_user(&headers, &resources).await?;
        users::change_password(
            &resources.database,
            &resources.auth_manager,
            &user,
            &body.current_password,
            &body.new_password,
        )
        .await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    /// Handle GET /api/users/subscriptions/
    async fn handle_subscriptions(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<SubscriptionsQuery>,
    ) -> Result<Response, AppError> {
        let user = require_user(&headers, &resources).await?;
        let request = PageParams {
            page: query.page,
            limit: query.limit,
        }
        .resolve(resources.config.page_size);
        let base_url = resources.config.base_url.as_str();

        let (authors, count) =
            subscriptions::subscriptions(&resources.database, user.id, request, query.recipes_limit)
                .await?;
        let results: Vec<AuthorResponse> = authors
            .into_iter()
            .map(|entry| AuthorResponse::from((entry, base_url)))
            .collect();

        let mut link_base = format!("{base_url}/api/users/subscriptions/");
        if let Some(limit) = query.recipes_limit {
            link_base = format!("{link_base}?recipes_limit={limit}");
        }
        let page = Page::new(results, count, request, &link_base);
        Ok((StatusCode::OK, Json(page)).into_response())
    }

    /// Handle POST /api/users/:id/subscribe/
    async fn handle_subscribe(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
        Query(query): Query<SubscribeQuery>,
    ) -> Result<Response, AppError> {
        let user = require_user(&headers, &resources).await?;
        let (_, author) = subscriptions::follow(&resources.database, user.id, id).await?;

        let recipes = resources.database.recipes();
        let recipes_count = i64::try_from(recipes.by_author(author.id, None).await?.len())
            .map_err(|e| AppError::internal(format!("Recipe count overflow: {e}")))?;
        let preview = recipes
            .by_author(author.id, query.recipes_limit.map(|limit| limit.max(0)))
            .await?;

        let body = AuthorResponse::new(
            &author,
            &preview,
            recipes_count,
            &resources.config.base_url,
        );
        Ok((StatusCode::CREATED, Json(body)).into_response())
    }

    /// Handle DELETE /api/users/:id/subscribe/
    async fn handle_unsubscribe(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let user = require_user(&headers, &resources).await?;
        subscriptions::unfollow(&resources.database, user.id, id).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
