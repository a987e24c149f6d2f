// ABOUTME: Centralized resource container shared by every request handler
// ABOUTME: Holds the database, auth manager, media store and configuration behind Arc
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! # Server Resources
//!
//! Built once at startup and handed to every route group as
//! `Arc<ServerResources>`.

use std::sync::Arc;

use tracing::warn;

use crate::auth::{generate_jwt_secret, AuthManager};
use crate::config::environment::ServerConfig;
use crate::database::Database;
use crate::media::MediaStore;

/// Centralized resource container for dependency injection
#[derive(Clone)]
pub struct ServerResources {
    /// Database handle
    pub database: Arc<Database>,
    /// Token and password handling
    pub auth_manager: Arc<AuthManager>,
    /// Uploaded image storage
    pub media: Arc<MediaStore>,
    /// Server configuration
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Build resources from an open database and the server configuration
    #[must_use]
    pub fn new(database: Database, config: Arc<ServerConfig>) -> Self {
        let secret = config.auth.jwt_secret.as_ref().map_or_else(
            || {
                warn!("Generating an ephemeral JWT secret");
                generate_jwt_secret().to_vec()
            },
            |secret| secret.as_bytes().to_vec(),
        );

        let auth_manager = AuthManager::new(
            &secret,
            config.auth.jwt_expiry_hours,
            config.auth.bcrypt_cost,
        );

        Self {
            database: Arc::new(database),
            auth_manager: Arc::new(auth_manager),
            media: Arc::new(MediaStore::new(&config.media)),
            config,
        }
    }
}
