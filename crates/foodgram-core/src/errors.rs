// ABOUTME: Unified error handling with standard error codes and HTTP status mapping
// ABOUTME: Defines AppError, ErrorCode, and the JSON error response envelope
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! # Unified Error Handling System
//!
//! Every fallible operation in the server returns [`AppResult`]. Domain
//! failures (validation, duplicates, missing relations, image rejections) are
//! distinguished by [`ErrorCode`], which also decides the HTTP status.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Authentication & Authorization (1000-1999)
    #[serde(rename = "AUTH_REQUIRED")]
    AuthRequired = 1000,
    #[serde(rename = "AUTH_INVALID")]
    AuthInvalid = 1001,
    #[serde(rename = "PERMISSION_DENIED")]
    PermissionDenied = 1004,

    // Validation (3000-3999)
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,
    #[serde(rename = "MISSING_REQUIRED_FIELD")]
    MissingRequiredField = 3001,
    #[serde(rename = "SELF_SUBSCRIPTION")]
    SelfSubscription = 3004,
    #[serde(rename = "UNSUPPORTED_IMAGE_FORMAT")]
    UnsupportedImageFormat = 3005,
    #[serde(rename = "IMAGE_TOO_LARGE")]
    ImageTooLarge = 3006,

    // Resource Management (4000-4999)
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound = 4000,
    #[serde(rename = "ALREADY_EXISTS")]
    AlreadyExists = 4001,
    #[serde(rename = "RELATION_NOT_FOUND")]
    RelationNotFound = 4004,

    // Configuration (6000-6999)
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError = 6000,

    // Internal Errors (9000-9999)
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
    #[serde(rename = "DATABASE_ERROR")]
    DatabaseError = 9001,
    #[serde(rename = "STORAGE_ERROR")]
    StorageError = 9002,
    #[serde(rename = "SERIALIZATION_ERROR")]
    SerializationError = 9003,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    ///
    /// Duplicate and missing relation toggles answer 400 rather than 409/404:
    /// clients of the recipe API treat them as rejected input.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::InvalidInput
            | Self::MissingRequiredField
            | Self::SelfSubscription
            | Self::UnsupportedImageFormat
            | Self::ImageTooLarge
            | Self::AlreadyExists
            | Self::RelationNotFound => 400,

            Self::AuthRequired | Self::AuthInvalid => 401,

            Self::PermissionDenied => 403,

            Self::ResourceNotFound => 404,

            Self::InternalError
            | Self::DatabaseError
            | Self::StorageError
            | Self::SerializationError
            | Self::ConfigError => 500,
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::AuthRequired => "Authentication is required to access this resource",
            Self::AuthInvalid => "The provided authentication credentials are invalid",
            Self::PermissionDenied => "You do not have permission to perform this action",
            Self::InvalidInput => "The provided input is invalid",
            Self::MissingRequiredField => "A required field is missing from the request",
            Self::SelfSubscription => "Users cannot subscribe to themselves",
            Self::UnsupportedImageFormat => "The image format is not supported",
            Self::ImageTooLarge => "The image exceeds the maximum allowed size",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::AlreadyExists => "The relation already exists",
            Self::RelationNotFound => "The relation does not exist",
            Self::ConfigError => "Configuration error encountered",
            Self::InternalError => "An internal server error occurred",
            Self::DatabaseError => "Database operation failed",
            Self::StorageError => "Storage operation failed",
            Self::SerializationError => "Data serialization/deserialization failed",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
#[error("{}: {}", .code.description(), .message)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Field-level details (e.g. `{"ingredients": ["..."]}`)
    pub details: Option<serde_json::Value>,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    /// Attach field-level details
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Attach a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Authentication required
    #[must_use]
    pub fn auth_required() -> Self {
        Self::new(ErrorCode::AuthRequired, "Authentication required")
    }

    /// Invalid authentication
    pub fn auth_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthInvalid, message)
    }

    /// Caller is not allowed to touch this resource
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PermissionDenied, message)
    }

    /// Resource not found
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Invalid input attributed to a single request field
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(ErrorCode::InvalidInput, format!("{field}: {message}"))
            .with_details(serde_json::json!({ field: [message] }))
    }

    /// Required field missing from the payload
    pub fn missing_field(field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(ErrorCode::MissingRequiredField, format!("{field}: {message}"))
            .with_details(serde_json::json!({ field: [message] }))
    }

    /// Unique relation already present
    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AlreadyExists, message)
    }

    /// Relation to remove is not present
    pub fn relation_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::RelationNotFound, message)
    }

    /// Attempt to subscribe to oneself
    #[must_use]
    pub fn self_subscription() -> Self {
        Self::new(
            ErrorCode::SelfSubscription,
            "Cannot subscribe to yourself",
        )
    }

    /// Image extension outside the allowed set
    pub fn unsupported_image_format(extension: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::UnsupportedImageFormat,
            format!("Unsupported image format: {}", extension.into()),
        )
    }

    /// Image larger than the configured maximum
    #[must_use]
    pub fn image_too_large(size: usize, max_size: usize) -> Self {
        Self::new(
            ErrorCode::ImageTooLarge,
            format!("Image is {size} bytes, the maximum is {max_size} bytes"),
        )
        .with_details(serde_json::json!({ "size": size, "max_size": max_size }))
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Database error
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Media storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageError, message)
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }
}

/// HTTP error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error payload
    pub error: ErrorResponseDetails,
}

/// Body of [`ErrorResponse`]
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponseDetails {
    /// Machine-readable code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Field-level details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self {
            error: ErrorResponseDetails {
                code: error.code,
                message: error.message,
                details: error.details,
            },
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(ErrorCode::SerializationError, error.to_string()).with_source(error)
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::storage(error.to_string()).with_source(error)
    }
}

#[cfg(feature = "database-errors")]
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => Self::not_found("Record"),
            other => {
                let message = other.to_string();
                Self::database(message).with_source(other)
            }
        }
    }
}

#[cfg(feature = "http-response")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = http::StatusCode::from_u16(self.http_status())
            .unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(error.code = ?self.code, error = %self, "Request failed");
        } else {
            tracing::debug!(error.code = ?self.code, error = %self, "Request rejected");
        }

        (status, axum::Json(ErrorResponse::from(self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_http_status() {
        assert_eq!(ErrorCode::AuthRequired.http_status(), 401);
        assert_eq!(ErrorCode::PermissionDenied.http_status(), 403);
        assert_eq!(ErrorCode::ResourceNotFound.http_status(), 404);
        assert_eq!(ErrorCode::AlreadyExists.http_status(), 400);
        assert_eq!(ErrorCode::RelationNotFound.http_status(), 400);
        assert_eq!(ErrorCode::DatabaseError.http_status(), 500);
    }

    #[test]
    fn test_invalid_field_carries_details() {
        let error = AppError::invalid_field("ingredients", "duplicate ingredient");
        assert_eq!(error.code, ErrorCode::InvalidInput);
        assert_eq!(
            error.details,
            Some(serde_json::json!({ "ingredients": ["duplicate ingredient"] }))
        );
    }

    #[test]
    fn test_display_includes_description() {
        let error = AppError::self_subscription();
        assert_eq!(
            error.to_string(),
            "Users cannot subscribe to themselves: Cannot subscribe to yourself"
        );
    }

    #[test]
    fn test_error_response_serialization() {
        let response = ErrorResponse::from(AppError::image_too_large(10, 5));
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("IMAGE_TOO_LARGE"));
        assert!(json.contains("max_size"));

        let plain = ErrorResponse::from(AppError::not_found("Recipe 5"));
        let json = serde_json::to_value(&plain).unwrap();
        assert_eq!(json["error"]["message"], "Recipe 5 not found");
        assert!(json["error"].get("details").is_none());
    }
}
