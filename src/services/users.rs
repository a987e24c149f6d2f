// ABOUTME: User account business logic extracted from route handlers
// ABOUTME: Registration validation, credential checks, password changes and avatar storage
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use crate::auth::AuthManager;
use crate::constants::limits::{
    EMAIL_MAX_LENGTH, PASSWORD_MIN_LENGTH, PERSON_NAME_MAX_LENGTH, USERNAME_MAX_LENGTH,
    USERNAME_PATTERN,
};
use crate::constants::media::AVATARS_DIR;
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use crate::media::{ImageUpload, MediaStore};
use crate::models::{NewUser, User};

static USERNAME_REGEX: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();

fn username_regex() -> AppResult<&'static Regex> {
    USERNAME_REGEX
        .get_or_init(|| Regex::new(USERNAME_PATTERN))
        .as_ref()
        .map_err(|e| AppError::internal(format!("Invalid username pattern: {e}")))
}

/// Registration payload
#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
    /// Login identifier
    pub email: String,
    /// Public handle
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Plain-text password
    pub password: String,
}

fn require(field: &str, value: &str, max_length: usize) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::invalid_field(field, "this field may not be blank"));
    }
    if value.chars().count() > max_length {
        return Err(AppError::invalid_field(
            field,
            format!("must be at most {max_length} characters"),
        ));
    }
    Ok(())
}

fn validate_password(field: &str, password: &str) -> AppResult<()> {
    if password.chars().count() < PASSWORD_MIN_LENGTH {
        return Err(AppError::invalid_field(
            field,
            format!("must be at least {PASSWORD_MIN_LENGTH} characters"),
        ));
    }
    Ok(())
}

/// Check every registration field
///
/// # Errors
///
/// `InvalidInput` naming the first offending field
pub fn validate_registration(registration: &Registration) -> AppResult<()> {
    require("email", &registration.email, EMAIL_MAX_LENGTH)?;
    let email = registration.email.trim();
    let well_formed = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !well_formed || email.contains(char::is_whitespace) {
        return Err(AppError::invalid_field("email", "enter a valid email address"));
    }

    require("username", &registration.username, USERNAME_MAX_LENGTH)?;
    if !username_regex()?.is_match(&registration.username) {
        return Err(AppError::invalid_field(
            "username",
            "may contain only letters, digits and @/./+/-/_",
        ));
    }

    require("first_name", &registration.first_name, PERSON_NAME_MAX_LENGTH)?;
    require("last_name", &registration.last_name, PERSON_NAME_MAX_LENGTH)?;
    validate_password("password", &registration.password)
}

/// Validate and create an account
///
/// # Errors
///
/// Validation errors, or `AlreadyExists` for a taken email or username
pub async fn register(
    database: &Database,
    auth: &AuthManager,
    registration: Registration,
) -> AppResult<User> {
    validate_registration(&registration)?;
    let password_hash = auth.hash_password(&registration.password).await?;

    let user = database
        .users()
        .create(&NewUser {
            email: registration.email.trim().to_owned(),
            username: registration.username,
            first_name: registration.first_name.trim().to_owned(),
            last_name: registration.last_name.trim().to_owned(),
            password_hash,
        })
        .await?;

    AppLogger::log_auth_event(Some(user.id), "register", true);
    Ok(user)
}

/// Exchange credentials for a token
///
/// # Errors
///
/// `AuthInvalid` for an unknown email or a wrong password
pub async fn login(
    database: &Database,
    auth: &AuthManager,
    email: &str,
    password: &str,
) -> AppResult<String> {
    let invalid = || AppError::auth_invalid("Unable to log in with provided credentials");

    let Some(user) = database.users().get_by_email(email.trim()).await? else {
        AppLogger::log_auth_event(None, "login", false);
        return Err(invalid());
    };
    if !auth.verify_password(password, &user.password_hash).await? {
        AppLogger::log_auth_event(Some(user.id), "login", false);
        return Err(invalid());
    }

    AppLogger::log_auth_event(Some(user.id), "login", true);
    auth.generate_token(&user)
}

/// Replace the password after checking the current one
///
/// # Errors
///
/// `InvalidInput` for a wrong current password or a too-short new one
pub async fn change_password(
    database: &Database,
    auth: &AuthManager,
    user: &User,
    current_password: &str,
    new_password: &str,
) -> AppResult<()> {
    if !auth.verify_password(current_password, &user.password_hash).await? {
        return Err(AppError::invalid_field("current_password", "invalid password"));
    }
    validate_password("new_password", new_password)?;

    let hash = auth.hash_password(new_password).await?;
    database.users().update_password(user.id, &hash).await?;
    AppLogger::log_auth_event(Some(user.id), "set_password", true);
    Ok(())
}

/// Store a new avatar and drop the previous file
///
/// # Errors
///
/// Image validation, storage or database failures
pub async fn set_avatar(
    database: &Database,
    media: &MediaStore,
    user: &User,
    upload: &ImageUpload,
) -> AppResult<String> {
    let path = media.save(AVATARS_DIR, upload).await?;
    if let Err(e) = database.users().set_avatar(user.id, Some(&path)).await {
        media.delete(&path).await;
        return Err(e);
    }
    if let Some(previous) = &user.avatar {
        media.delete(previous).await;
    }
    Ok(path)
}

/// Remove the avatar
///
/// # Errors
///
/// Database failures
pub async fn delete_avatar(database: &Database, media: &MediaStore, user: &User) -> AppResult<()> {
    database.users().set_avatar(user.id, None).await?;
    if let Some(previous) = &user.avatar {
        media.delete(previous).await;
    }
    Ok(())
}
