// ABOUTME: Health check route handler for service monitoring
// ABOUTME: Answers load balancer probes without touching the database
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! Health check routes for service monitoring

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the health check route
    pub fn routes() -> Router {
        async fn health_handler() -> Json<Value> {
            Json(json!({ "status": "ok" }))
        }

        Router::new().route("/api/health", get(health_handler))
    }
}
