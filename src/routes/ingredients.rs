// ABOUTME: Ingredient catalogue route handlers
// ABOUTME: Unpaginated list with case-insensitive name prefix search and lookup by ID
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::resources::ServerResources;

/// Query parameters for the ingredient list
#[derive(Debug, Default, Deserialize)]
pub struct IngredientQuery {
    /// Case-insensitive name prefix
    pub name: Option<String>,
}

/// Ingredient routes implementation
pub struct IngredientRoutes;

impl IngredientRoutes {
    /// Create all ingredient routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/ingredients/", get(Self::handle_list))
            .route("/api/ingredients/:id/", get(Self::handle_get))
            .with_state(resources)
    }

    /// Handle GET /api/ingredients/
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        Query(query): Query<IngredientQuery>,
    ) -> Result<Response, AppError> {
        let ingredients = resources
            .database
            .ingredients()
            .list(query.name.as_deref())
            .await?;
        Ok((StatusCode::OK, Json(ingredients)).into_response())
    }

    /// Handle GET /api/ingredients/:id/
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let ingredient = resources
            .database
            .ingredients()
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("Ingredient"))?;
        Ok((StatusCode::OK, Json(ingredient)).into_response())
    }
}
