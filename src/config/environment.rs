// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables, deployment modes, and runtime configuration parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! Environment-based configuration management for production deployment

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::constants::{limits, media, network, pagination};

/// Environment type for security and other configurations
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Database settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL (`sqlite:path` or `sqlite::memory:`)
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: network::DEFAULT_DATABASE_URL.to_owned(),
        }
    }
}

/// Authentication settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret for JWT signing; generated per process when absent outside production
    #[serde(skip_serializing)]
    pub jwt_secret: Option<String>,
    /// JWT expiry time in hours
    pub jwt_expiry_hours: i64,
    /// bcrypt work factor
    pub bcrypt_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            jwt_expiry_hours: limits::DEFAULT_JWT_EXPIRY_HOURS,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

/// Uploaded image settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Directory uploaded images are written to
    pub root: PathBuf,
    /// Largest accepted image in bytes
    pub max_image_size_bytes: usize,
    /// Accepted lower-case extensions
    pub allowed_image_extensions: Vec<String>,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(media::DEFAULT_MEDIA_ROOT),
            max_image_size_bytes: media::DEFAULT_MAX_IMAGE_SIZE_BYTES,
            allowed_image_extensions: media::DEFAULT_ALLOWED_IMAGE_EXTENSIONS
                .iter()
                .map(|ext| (*ext).to_owned())
                .collect(),
        }
    }
}

/// Complete server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP API port
    pub http_port: u16,
    /// Public base URL used for absolute links (short links, media, pagination)
    pub base_url: String,
    /// Deployment environment
    pub environment: Environment,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Authentication configuration
    pub auth: AuthConfig,
    /// Media configuration
    pub media: MediaConfig,
    /// JSON file read by the ingredient loader
    pub ingredients_file: PathBuf,
    /// Default page size for list endpoints
    pub page_size: u32,
    /// Comma-separated CORS origins, `*` for any
    pub cors_allowed_origins: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: network::DEFAULT_HTTP_PORT,
            base_url: network::DEFAULT_BASE_URL.to_owned(),
            environment: Environment::Development,
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            media: MediaConfig::default(),
            ingredients_file: PathBuf::from(network::DEFAULT_INGREDIENTS_FILE),
            page_size: pagination::DEFAULT_PAGE_SIZE,
            cors_allowed_origins: "*".to_owned(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but unparsable, or if a
    /// production deployment lacks `JWT_SECRET`
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");
        let config = Self::from_lookup(|key| env::var(key).ok())?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// # Errors
    ///
    /// Same as [`ServerConfig::from_env`]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let environment = lookup("ENVIRONMENT")
            .map(|value| Environment::from_str_or_default(&value))
            .unwrap_or_default();

        let allowed_image_extensions = lookup("ALLOWED_IMAGE_EXTENSIONS").map_or(
            defaults.media.allowed_image_extensions,
            |value| parse_list(&value),
        );

        let config = Self {
            http_port: parse_or(&lookup, "HTTP_PORT", defaults.http_port)?,
            base_url: lookup("BASE_URL")
                .map_or(defaults.base_url, |url| url.trim_end_matches('/').to_owned()),
            environment,
            database: DatabaseConfig {
                url: lookup("DATABASE_URL").unwrap_or(defaults.database.url),
            },
            auth: AuthConfig {
                jwt_secret: lookup("JWT_SECRET").filter(|secret| !secret.is_empty()),
                jwt_expiry_hours: parse_or(
                    &lookup,
                    "JWT_EXPIRY_HOURS",
                    defaults.auth.jwt_expiry_hours,
                )?,
                bcrypt_cost: parse_or(&lookup, "BCRYPT_COST", defaults.auth.bcrypt_cost)?,
            },
            media: MediaConfig {
                root: lookup("MEDIA_ROOT").map_or(defaults.media.root, PathBuf::from),
                max_image_size_bytes: parse_or(
                    &lookup,
                    "MAX_IMAGE_SIZE_BYTES",
                    defaults.media.max_image_size_bytes,
                )?,
                allowed_image_extensions,
            },
            ingredients_file: lookup("INGREDIENTS_FILE")
                .map_or(defaults.ingredients_file, PathBuf::from),
            page_size: parse_or(&lookup, "PAGE_SIZE", defaults.page_size)?,
            cors_allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                .unwrap_or(defaults.cors_allowed_origins),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error when a value is outside its accepted range
    pub fn validate(&self) -> Result<()> {
        if self.environment.is_production() && self.auth.jwt_secret.is_none() {
            anyhow::bail!("JWT_SECRET must be set in production");
        }
        if self.auth.jwt_expiry_hours <= 0 {
            anyhow::bail!("JWT_EXPIRY_HOURS must be positive");
        }
        let bcrypt_costs = limits::MIN_BCRYPT_COST..=limits::MAX_BCRYPT_COST;
        if !bcrypt_costs.contains(&self.auth.bcrypt_cost) {
            anyhow::bail!(
                "BCRYPT_COST must be between {} and {}",
                limits::MIN_BCRYPT_COST,
                limits::MAX_BCRYPT_COST
            );
        }
        if self.media.allowed_image_extensions.is_empty() {
            anyhow::bail!("ALLOWED_IMAGE_EXTENSIONS must list at least one extension");
        }
        if self.page_size == 0 {
            anyhow::bail!("PAGE_SIZE must be positive");
        }
        if self.auth.jwt_secret.is_none() {
            warn!("JWT_SECRET not set; tokens will not survive a restart");
        }
        Ok(())
    }

    /// Log-safe configuration summary
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Foodgram Server Configuration:\n\
             - Environment: {}\n\
             - HTTP Port: {}\n\
             - Base URL: {}\n\
             - Database: {}\n\
             - JWT Secret: {}\n\
             - Media Root: {}\n\
             - Max Image Size: {} bytes\n\
             - Image Extensions: {}\n\
             - Page Size: {}",
            self.environment,
            self.http_port,
            self.base_url,
            self.database.url,
            if self.auth.jwt_secret.is_some() {
                "Configured"
            } else {
                "Ephemeral"
            },
            self.media.root.display(),
            self.media.max_image_size_bytes,
            self.media.allowed_image_extensions.join(","),
            self.page_size,
        )
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key).map_or(Ok(default), |value| {
        value
            .trim()
            .parse()
            .with_context(|| format!("Invalid {key} value: {value}"))
    })
}

/// Settings read by the ingredient loader
///
/// Only the database and the source file are read, so the loader runs in
/// deployments whose server settings (such as `JWT_SECRET`) are not exported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientLoaderConfig {
    /// Database configuration
    pub database: DatabaseConfig,
    /// JSON file to import
    pub ingredients_file: PathBuf,
}

impl IngredientLoaderConfig {
    /// Load loader settings from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build loader settings from an arbitrary key lookup
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            database: DatabaseConfig {
                url: lookup("DATABASE_URL")
                    .unwrap_or_else(|| network::DEFAULT_DATABASE_URL.to_owned()),
            },
            ingredients_file: lookup("INGREDIENTS_FILE").map_or_else(
                || PathBuf::from(network::DEFAULT_INGREDIENTS_FILE),
                PathBuf::from,
            ),
        }
    }
}

/// Parse comma-separated, lower-cased values
fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|item| item.trim().trim_start_matches('.').to_lowercase())
        .filter(|item| !item.is_empty())
        .collect()
}
