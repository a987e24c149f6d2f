// ABOUTME: Short-link redirect handler
// ABOUTME: Resolves /s/{id} to the recipe page after checking the recipe exists
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use crate::constants::network::SHORT_LINK_PREFIX;
use crate::errors::AppError;
use crate::resources::ServerResources;

/// Absolute short link for a recipe
#[must_use]
pub fn short_link(base_url: &str, recipe_id: i64) -> String {
    format!(
        "{}{SHORT_LINK_PREFIX}/{recipe_id}",
        base_url.trim_end_matches('/')
    )
}

/// Short-link routes implementation
pub struct ShortLinkRoutes;

impl ShortLinkRoutes {
    /// Create the redirect routes, with and without trailing slash
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(&format!("{SHORT_LINK_PREFIX}/:id"), get(Self::handle_redirect))
            .route(&format!("{SHORT_LINK_PREFIX}/:id/"), get(Self::handle_redirect))
            .with_state(resources)
    }

    /// Handle GET /s/:id with a 302 to the recipe page
    async fn handle_redirect(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        if !resources.database.recipes().exists(id).await? {
            return Err(AppError::not_found("Recipe"));
        }
        Ok((StatusCode::FOUND, [(header::LOCATION, format!("/recipes/{id}/"))]).into_response())
    }
}
