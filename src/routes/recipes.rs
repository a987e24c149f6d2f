// ABOUTME: Recipe route handlers including favorites, shopping cart and short links
// ABOUTME: CRUD with nested ingredient lines, filtered pagination and the shopping list download
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! Recipe routes
//!
//! Reading is public; anonymous callers see `is_favorited` and
//! `is_in_shopping_cart` as false and cannot use those filters. Writing
//! requires authentication, and only the author may change a recipe.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::short_links::short_link;
use super::{optional_user, require_user, RecipeShortResponse, UserResponse};
use crate::constants::shopping_list::FILENAME;
use crate::database::RecipeFilter;
use crate::errors::{AppError, AppResult};
use crate::media::{ImageUpload, MediaStore};
use crate::models::{
    IngredientAmount, Recipe, RecipeCollection, RecipeDraft, RecipeIngredientLine, RecipeUpdate,
};
use crate::pagination::{Page, PageParams};
use crate::resources::ServerResources;
use crate::services::recipes::{self as recipe_service, RecipeDetails};
use crate::services::{collections, shopping_list};

/// Create and update payload; which fields are required depends on the method
#[derive(Debug, Default, Deserialize)]
pub struct RecipePayload {
    /// Ingredient lines
    pub ingredients: Option<Vec<IngredientAmount>>,
    /// Base64 data URI
    pub image: Option<String>,
    /// Title
    pub name: Option<String>,
    /// Description
    pub text: Option<String>,
    /// Minutes
    pub cooking_time: Option<i64>,
}

impl RecipePayload {
    fn decode_image(&self) -> AppResult<Option<ImageUpload>> {
        self.image
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .map(|value| ImageUpload::from_data_uri("image", value))
            .transpose()
    }

    fn into_draft(self) -> AppResult<RecipeDraft> {
        let image = self.decode_image()?;
        Ok(RecipeDraft {
            name: self
                .name
                .ok_or_else(|| AppError::missing_field("name", "this field is required"))?,
            text: self
                .text
                .ok_or_else(|| AppError::missing_field("text", "this field is required"))?,
            cooking_time: self
                .cooking_time
                .ok_or_else(|| AppError::missing_field("cooking_time", "this field is required"))?,
            image,
            ingredients: self
                .ingredients
                .ok_or_else(|| AppError::missing_field("ingredients", "this field is required"))?,
        })
    }

    fn into_update(self) -> AppResult<RecipeUpdate> {
        let image = self.decode_image()?;
        Ok(RecipeUpdate {
            name: self.name,
            text: self.text,
            cooking_time: self.cooking_time,
            image,
            ingredients: self.ingredients,
        })
    }
}

/// Query parameters for the recipe list
#[derive(Debug, Default, Deserialize)]
pub struct RecipeListQuery {
    /// 1-based page number
    pub page: Option<u32>,
    /// Page size
    pub limit: Option<u32>,
    /// Only recipes by this author
    pub author: Option<i64>,
    /// `1` to show only the caller's favorites
    pub is_favorited: Option<String>,
    /// `1` to show only the caller's cart
    pub is_in_shopping_cart: Option<String>,
}

fn flag_set(value: Option<&str>) -> bool {
    matches!(value, Some("1" | "true" | "True"))
}

/// Full recipe representation
#[derive(Debug, Serialize, Deserialize)]
pub struct RecipeResponse {
    /// Recipe ID
    pub id: i64,
    /// Author representation
    pub author: UserResponse,
    /// Lines with ingredient details
    pub ingredients: Vec<RecipeIngredientLine>,
    /// Whether the caller favorited the recipe
    pub is_favorited: bool,
    /// Whether the recipe is in the caller's cart
    pub is_in_shopping_cart: bool,
    /// Title
    pub name: String,
    /// Absolute image URL
    pub image: String,
    /// Description
    pub text: String,
    /// Minutes
    pub cooking_time: i64,
}

impl RecipeResponse {
    fn new(details: RecipeDetails, base_url: &str) -> Self {
        let RecipeDetails {
            recipe,
            author,
            author_is_subscribed,
            ingredients,
            is_favorited,
            is_in_shopping_cart,
        } = details;

        Self {
            id: recipe.id,
            author: UserResponse::new(&author, author_is_subscribed, base_url),
            ingredients,
            is_favorited,
            is_in_shopping_cart,
            image: MediaStore::url_for(base_url, &recipe.image),
            name: recipe.name,
            text: recipe.text,
            cooking_time: recipe.cooking_time,
        }
    }
}

/// Short link response
#[derive(Debug, Serialize, Deserialize)]
pub struct ShortLinkResponse {
    /// Absolute short URL
    #[serde(rename = "short-link")]
    pub short_link: String,
}

/// Recipe routes implementation
pub struct RecipeRoutes;

impl RecipeRoutes {
    /// Create all recipe routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/recipes/",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route(
                "/api/recipes/download_shopping_cart/",
                get(Self::handle_download_shopping_cart),
            )
            .route(
                "/api/recipes/:id/",
                get(Self::handle_get)
                    .patch(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .route(
                "/api/recipes/:id/favorite/",
                post(Self::handle_favorite_add).delete(Self::handle_favorite_remove),
            )
            .route(
                "/api/recipes/:id/shopping_cart/",
                post(Self::handle_cart_add).delete(Self::handle_cart_remove),
            )
            .route("/api/recipes/:id/get-link/", get(Self::handle_get_link))
            .with_state(resources)
    }

    async fn respond_with_details(
        resources: &Arc<ServerResources>,
        recipe: Recipe,
        viewer_id: Option<i64>,
        status: StatusCode,
    ) -> Result<Response, AppError> {
        let details = recipe_service::load_details(&resources.database, recipe, viewer_id).await?;
        let body = RecipeResponse::new(details, &resources.config.base_url);
        Ok((status, Json(body)).into_response())
    }

    /// Handle GET /api/recipes/
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<RecipeListQuery>,
    ) -> Result<Response, AppError> {
        let viewer = optional_user(&headers, &resources).await?;
        let viewer_id = viewer.as_ref().map(|user| user.id);

        let filter = RecipeFilter {
            author_id: query.author,
            favorited_by: viewer_id.filter(|_| flag_set(query.is_favorited.as_deref())),
            in_cart_of: viewer_id.filter(|_| flag_set(query.is_in_shopping_cart.as_deref())),
        };
        let request = PageParams {
            page: query.page,
            limit: query.limit,
        }
        .resolve(resources.config.page_size);

        let (recipes, count) = resources.database.recipes().list(&filter, request).await?;
        let mut results = Vec::with_capacity(recipes.len());
        for recipe in recipes {
            let details =
                recipe_service::load_details(&resources.database, recipe, viewer_id).await?;
            results.push(RecipeResponse::new(details, &resources.config.base_url));
        }

        let mut filters = Vec::new();
        if let Some(author) = filter.author_id {
            filters.push(format!("author={author}"));
        }
        if filter.favorited_by.is_some() {
            filters.push("is_favorited=1".to_owned());
        }
        if filter.in_cart_of.is_some() {
            filters.push("is_in_shopping_cart=1".to_owned());
        }
        let mut link_base = format!("{}/api/recipes/", resources.config.base_url);
        if !filters.is_empty() {
            link_base = format!("{link_base}?{}", filters.join("&"));
        }

        let page = Page::new(results, count, request, &link_base);
        Ok((StatusCode::OK, Json(page)).into_response())
    }

    /// Handle POST /api/recipes/
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(payload): Json<RecipePayload>,
    ) -> Result<Response, AppError> {
        let user = require_user(&headers, &resources).await?;
        let draft = payload.into_draft()?;

        let recipe =
            recipe_service::create_recipe(&resources.database, &resources.media, user.id, draft)
                .await?;
        Self::respond_with_details(&resources, recipe, Some(user.id), StatusCode::CREATED).await
    }

    /// Handle GET /api/recipes/:id/
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let viewer = optional_user(&headers, &resources).await?;
        let recipe = resources
            .database
            .recipes()
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("Recipe"))?;

        Self::respond_with_details(&resources, recipe, viewer.map(|u| u.id), StatusCode::OK).await
    }

    /// Handle PATCH /api/recipes/:id/
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
        Json(payload): Json<RecipePayload>,
    ) -> Result<Response, AppError> {
        let user = require_user(&headers, &resources).await?;
        let changes = payload.into_update()?;

        let recipe = recipe_service::update_recipe(
            &resources.database,
            &resources.media,
            user.id,
            id,
            changes,
        )
        .await?;
        Self::respond_with_details(&resources, recipe, Some(user.id), StatusCode::OK).await
    }

    /// Handle DELETE /api/recipes/:id/
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let user = require_user(&headers, &resources).await?;
        recipe_service::delete_recipe(&resources.database, &resources.media, user.id, id).await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    async fn collect(
        resources: &Arc<ServerResources>,
        headers: &HeaderMap,
        collection: RecipeCollection,
        recipe_id: i64,
    ) -> Result<Response, AppError> {
        let user = require_user(headers, resources).await?;
        let (_, recipe) =
            collections::add_to_collection(&resources.database, collection, user.id, recipe_id)
                .await?;
        let body = RecipeShortResponse::new(&recipe, &resources.config.base_url);
        Ok((StatusCode::CREATED, Json(body)).into_response())
    }

    async fn uncollect(
        resources: &Arc<ServerResources>,
        headers: &HeaderMap,
        collection: RecipeCollection,
        recipe_id: i64,
    ) -> Result<Response, AppError> {
        let user = require_user(headers, resources).await?;
        collections::remove_from_collection(&resources.database, collection, user.id, recipe_id)
            .await?;
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    /// Handle POST /api/recipes/:id/favorite/
    async fn handle_favorite_add(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        Self::collect(&resources, &headers, RecipeCollection::Favorites, id).await
    }

    /// Handle DELETE /api/recipes/:id/favorite/
    async fn handle_favorite_remove(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        Self::uncollect(&resources, &headers, RecipeCollection::Favorites, id).await
    }

    /// Handle POST /api/recipes/:id/shopping_cart/
    async fn handle_cart_add(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        Self::collect(&resources, &headers, RecipeCollection::ShoppingCart, id).await
    }

    /// Handle DELETE /api/recipes/:id/shopping_cart/
    async fn handle_cart_remove(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        Self::uncollect(&resources, &headers, RecipeCollection::ShoppingCart, id).await
    }

    /// Handle GET /api/recipes/download_shopping_cart/
    async fn handle_download_shopping_cart(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = require_user(&headers, &resources).await?;
        let report = shopping_list::build_report(&resources.database, user.id).await?;

        Ok((
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_owned()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{FILENAME}\""),
                ),
            ],
            report,
        )
            .into_response())
    }

    /// Handle GET /api/recipes/:id/get-link/
    async fn handle_get_link(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        if !resources.database.recipes().exists(id).await? {
            return Err(AppError::not_found("Recipe"));
        }
        let body = ShortLinkResponse {
            short_link: short_link(&resources.config.base_url, id),
        };
        Ok((StatusCode::OK, Json(body)).into_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn test_create_requires_fields() {
        let err = RecipePayload::default().into_draft().unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingRequiredField);
    }

    #[test]
    fn test_update_keeps_missing_ingredients_as_none() {
        let payload: RecipePayload = serde_json::from_str(r#"{"name": "Soup"}"#).unwrap();
        let update = payload.into_update().unwrap();
        assert!(update.ingredients.is_none());
        assert!(update.image.is_none());
    }

    #[test]
    fn test_flag_values() {
        assert!(flag_set(Some("1")));
        assert!(flag_set(Some("true")));
        assert!(!flag_set(Some("0")));
        assert!(!flag_set(None));
    }
}
