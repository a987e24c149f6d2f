// ABOUTME: Token authentication route handlers
// ABOUTME: Email/password login issuing a JWT and a stateless logout endpoint
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! Authentication routes
//!
//! Tokens are stateless, so logout only checks that the caller is
//! authenticated; clients discard the token.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::require_user;
use crate::errors::AppError;
use crate::logging::AppLogger;
use crate::resources::ServerResources;
use crate::services::users;

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Login email
    pub email: String,
    /// Password
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Token for the `Authorization` header
    pub auth_token: String,
}

/// Authentication routes implementation
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create all authentication routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/auth/token/login/", post(Self::handle_login))
            .route("/api/auth/token/logout/", post(Self::handle_logout))
            .with_state(resources)
    }

    /// Handle POST /api/auth/token/login/
    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
        Json(body): Json<LoginRequest>,
    ) -> Result<Response, AppError> {
        let auth_token = users::login(
            &resources.database,
            &resources.auth_manager,
            &body.email,
            &body.password,
        )
        .await?;

        Ok((StatusCode::OK, Json(LoginResponse { auth_token })).into_response())
    }

    /// Handle POST /api/auth/token/logout/
    async fn handle_logout(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = require_user(&headers, &resources).await?;
        AppLogger::log_auth_event(Some(user.id), "logout", true);
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
