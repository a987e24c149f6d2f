// ABOUTME: HTTP server assembly: merges route groups, adds middleware and serves until shutdown
// ABOUTME: Also exposes the router builder so tests can drive the API in-process
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use http::{header::HeaderName, HeaderValue, Method};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::environment::ServerConfig;
use crate::constants::media::MEDIA_URL_PREFIX;
use crate::resources::ServerResources;
use crate::routes::{
    AuthRoutes, HealthRoutes, IngredientRoutes, RecipeRoutes, ShortLinkRoutes, UserRoutes,
};

/// JSON envelope allowance on top of the base64-encoded image
const BODY_OVERHEAD_BYTES: usize = 64 * 1024;

/// CORS layer from `CORS_ALLOWED_ORIGINS`
#[must_use]
pub fn setup_cors(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty() && *origin != "*")
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_headers([
            HeaderName::from_static("content-type"),
            HeaderName::from_static("authorization"),
            HeaderName::from_static("accept"),
            HeaderName::from_static("origin"),
        ])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
}

/// Largest accepted request body: a base64 image of the maximum size plus JSON
#[must_use]
pub const fn body_limit(max_image_size_bytes: usize) -> usize {
    max_image_size_bytes.div_ceil(3) * 4 + BODY_OVERHEAD_BYTES
}

/// Build the complete application router
pub fn build_router(resources: &Arc<ServerResources>) -> Router {
    let config = &resources.config;

    Router::new()
        .merge(HealthRoutes::routes())
        .merge(AuthRoutes::routes(Arc::clone(resources)))
        .merge(UserRoutes::routes(Arc::clone(resources)))
        .merge(IngredientRoutes::routes(Arc::clone(resources)))
        .merge(RecipeRoutes::routes(Arc::clone(resources)))
        .merge(ShortLinkRoutes::routes(Arc::clone(resources)))
        .nest_service(MEDIA_URL_PREFIX, ServeDir::new(&config.media.root))
        .layer(RequestBodyLimitLayer::new(body_limit(
            config.media.max_image_size_bytes,
        )))
        .layer(setup_cors(config))
        .layer(TraceLayer::new_for_http())
}

/// Foodgram HTTP server
pub struct FoodgramServer {
    resources: Arc<ServerResources>,
}

impl FoodgramServer {
    /// Wrap prepared resources
    #[must_use]
    pub const fn new(resources: Arc<ServerResources>) -> Self {
        Self { resources }
    }

    /// Serve on `port` until Ctrl-C
    ///
    /// # Errors
    ///
    /// Binding the listener or serving fails
    pub async fn run(self, port: u16) -> Result<()> {
        info!("{}", self.resources.config.summary());

        tokio::fs::create_dir_all(&self.resources.config.media.root)
            .await
            .with_context(|| {
                format!(
                    "Failed to create media root {}",
                    self.resources.config.media.root.display()
                )
            })?;

        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind HTTP listener on {addr}"))?;
        info!("HTTP server listening on http://{addr}");

        let app = build_router(&self.resources);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP server error")?;

        info!("HTTP server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
    }
    info!("Shutdown signal received");
}
