// ABOUTME: User account model
// ABOUTME: Identity, profile names, password hash and optional avatar path
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Registered user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// Unique user identifier
    pub id: i64,
    /// Login identifier, unique
    pub email: String,
    /// Public handle, unique
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// bcrypt hash, never serialized
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Media path of the avatar image, relative to the media root
    pub avatar: Option<String>,
    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl User {
    /// "First Last" when either name is set, otherwise the username
    #[must_use]
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_owned()
        }
    }
}

/// Validated registration data ready to be inserted
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Login identifier
    pub email: String,
    /// Public handle
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// bcrypt hash of the chosen password
    pub password_hash: String,
}
