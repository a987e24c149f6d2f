// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Field limits, media defaults, pagination sizes and report formatting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! Constants module
//!
//! Constants are grouped into logical domains rather than being in a single
//! flat namespace.

/// Service identifiers used in structured logs
pub mod service_names {
    /// HTTP API server
    pub const FOODGRAM_SERVER: &str = "foodgram-server";
    /// Ingredient loader binary
    pub const INGREDIENT_LOADER: &str = "load-ingredients";
}

/// Field length and value limits shared by validation and schema
pub mod limits {
    /// Maximum email length
    pub const EMAIL_MAX_LENGTH: usize = 100;
    /// Maximum username length
    pub const USERNAME_MAX_LENGTH: usize = 50;
    /// Maximum first/last name length
    pub const PERSON_NAME_MAX_LENGTH: usize = 50;
    /// Minimum password length
    pub const PASSWORD_MIN_LENGTH: usize = 8;
    /// Maximum recipe name length
    pub const RECIPE_NAME_MAX_LENGTH: usize = 256;
    /// Minimum cooking time in minutes
    pub const MIN_COOKING_TIME: i64 = 1;
    /// Maximum cooking time in minutes
    pub const MAX_COOKING_TIME: i64 = 32_000;
    /// Minimum amount for an ingredient line
    pub const MIN_INGREDIENT_AMOUNT: i64 = 1;
    /// Maximum amount for an ingredient line
    pub const MAX_INGREDIENT_AMOUNT: i64 = 32_000;
    /// Username must be made of word characters and `.@+-`
    pub const USERNAME_PATTERN: &str = r"^[\w.@+-]+\z";
    /// Lowest bcrypt work factor accepted by the hasher
    pub const MIN_BCRYPT_COST: u32 = 4;
    /// Highest bcrypt work factor accepted by the hasher
    pub const MAX_BCRYPT_COST: u32 = 31;
    /// JWT lifetime when not configured
    pub const DEFAULT_JWT_EXPIRY_HOURS: i64 = 24;
}

/// Uploaded image defaults
pub mod media {
    /// Default maximum image size (2 MB)
    pub const DEFAULT_MAX_IMAGE_SIZE_BYTES: usize = 2 * 1024 * 1024;
    /// Default allowed image extensions
    pub const DEFAULT_ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png", "gif"];
    /// Subdirectory for recipe images
    pub const RECIPES_DIR: &str = "recipes";
    /// Subdirectory for user avatars
    pub const AVATARS_DIR: &str = "avatars";
    /// URL prefix media files are served under
    pub const MEDIA_URL_PREFIX: &str = "/media";
    /// Default media root directory
    pub const DEFAULT_MEDIA_ROOT: &str = "./media";
}

/// List endpoint pagination
pub mod pagination {
    /// Page size when the client does not pass `limit`
    pub const DEFAULT_PAGE_SIZE: u32 = 6;
    /// Upper bound for client-supplied `limit`
    pub const MAX_PAGE_SIZE: u32 = 100;
}

/// Shopping list report
pub mod shopping_list {
    /// Download filename
    pub const FILENAME: &str = "shopping_list.txt";
    /// Timestamp format used in the report header
    pub const TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M";
    /// Report title
    pub const TITLE: &str = "Shopping list";
    /// Header of the recipe section
    pub const RECIPES_HEADER: &str = "Recipes in cart:";
}

/// Network and path defaults
pub mod network {
    /// Default HTTP port
    pub const DEFAULT_HTTP_PORT: u16 = 8000;
    /// Default public base URL
    pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
    /// Default database location
    pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/foodgram.db";
    /// Default ingredient data file
    pub const DEFAULT_INGREDIENTS_FILE: &str = "./data/ingredients.json";
    /// Short link path prefix
    pub const SHORT_LINK_PREFIX: &str = "/s";
}
