// ABOUTME: Image upload decoding, validation and on-disk storage
// ABOUTME: Parses base64 data URIs, enforces extension and size limits, writes under the media root
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! Uploaded images
//!
//! Clients send pictures inline as `data:image/<subtype>;base64,<payload>`.
//! The subtype becomes the file extension; validation runs before anything
//! touches the disk.

use std::fmt;
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::environment::MediaConfig;
use crate::constants::media::MEDIA_URL_PREFIX;
use crate::errors::{AppError, AppResult};

/// A decoded image upload
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// Lower-case extension derived from the MIME subtype
    pub extension: String,
    /// Raw image bytes
    pub data: Vec<u8>,
}

impl fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageUpload")
            .field("extension", &self.extension)
            .field("size", &self.data.len())
            .finish()
    }
}

impl ImageUpload {
    /// Decode `data:image/<ext>;base64,<payload>`
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for anything that is not a base64 image data URI
    pub fn from_data_uri(field: &str, value: &str) -> AppResult<Self> {
        let malformed = || AppError::invalid_field(field, "expected a base64 image data URI");

        let rest = value.trim().strip_prefix("data:").ok_or_else(malformed)?;
        let (header, payload) = rest.split_once(',').ok_or_else(malformed)?;
        let mime = header.strip_suffix(";base64").ok_or_else(malformed)?;
        let subtype = mime.strip_prefix("image/").ok_or_else(malformed)?;
        if subtype.is_empty() {
            return Err(malformed());
        }

        let data = STANDARD
            .decode(payload.trim())
            .map_err(|e| AppError::invalid_field(field, format!("invalid base64 payload: {e}")))?;
        if data.is_empty() {
            return Err(AppError::invalid_field(field, "image is empty"));
        }

        Ok(Self {
            extension: subtype.to_lowercase(),
            data,
        })
    }

    /// Size in bytes
    #[must_use]
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Extension and size checks
#[derive(Debug, Clone)]
pub struct ImageValidator {
    allowed_extensions: Vec<String>,
    max_size_bytes: usize,
}

impl ImageValidator {
    /// Create a validator
    #[must_use]
    pub fn new(allowed_extensions: Vec<String>, max_size_bytes: usize) -> Self {
        Self {
            allowed_extensions,
            max_size_bytes,
        }
    }

    /// Validate extension first, then size
    ///
    /// # Errors
    ///
    /// `UnsupportedImageFormat` or `ImageTooLarge`
    pub fn validate(&self, upload: &ImageUpload) -> AppResult<()> {
        let extension = upload.extension.to_lowercase();
        if !self.allowed_extensions.iter().any(|ext| *ext == extension) {
            return Err(AppError::unsupported_image_format(&extension));
        }
        if upload.size() > self.max_size_bytes {
            return Err(AppError::image_too_large(upload.size(), self.max_size_bytes));
        }
        Ok(())
    }
}

/// Writes validated images below the media root
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
    validator: ImageValidator,
}

impl MediaStore {
    /// Create a store from media configuration
    #[must_use]
    pub fn new(config: &MediaConfig) -> Self {
        Self {
            root: config.root.clone(),
            validator: ImageValidator::new(
                config.allowed_image_extensions.clone(),
                config.max_image_size_bytes,
            ),
        }
    }

    /// Media root directory
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Validator used by [`MediaStore::save`]
    #[must_use]
    pub const fn validator(&self) -> &ImageValidator {
        &self.validator
    }

    /// Validate and write an upload into `dir`, returning the relative media path
    ///
    /// # Errors
    ///
    /// Validation errors, or `StorageError` when the file cannot be written
    pub async fn save(&self, dir: &str, upload: &ImageUpload) -> AppResult<String> {
        self.validator.validate(upload)?;

        let relative = format!("{dir}/{}.{}", Uuid::new_v4(), upload.extension);
        let target = self.root.join(&relative);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AppError::storage(format!("Failed to create {}: {e}", parent.display()))
            })?;
        }
        tokio::fs::write(&target, &upload.data)
            .await
            .map_err(|e| AppError::storage(format!("Failed to write image: {e}")))?;

        debug!(path = %relative, size = upload.size(), "Stored image");
        Ok(relative)
    }

    /// Remove a stored file; failures are logged and ignored
    pub async fn delete(&self, relative: &str) {
        if relative.is_empty() || relative.contains("..") {
            return;
        }
        if let Err(e) = tokio::fs::remove_file(self.root.join(relative)).await {
            warn!(path = %relative, error = %e, "Failed to remove stored image");
        }
    }

    /// Absolute URL for a stored file
    #[must_use]
    pub fn url_for(base_url: &str, relative: &str) -> String {
        format!(
            "{}{MEDIA_URL_PREFIX}/{}",
            base_url.trim_end_matches('/'),
            relative.trim_start_matches('/')
        )
    }
}
