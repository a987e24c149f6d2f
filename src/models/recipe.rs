// ABOUTME: Recipe and ingredient models
// ABOUTME: Catalogue ingredients, recipes, their amount lines and create/update payloads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::media::ImageUpload;

/// Catalogue ingredient
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ingredient {
    /// Unique identifier
    pub id: i64,
    /// Display name, e.g. "salt"
    pub name: String,
    /// Unit amounts are expressed in, e.g. "g"
    pub measurement_unit: String,
}

/// One record of the ingredient import file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NewIngredient {
    /// Display name
    pub name: String,
    /// Unit amounts are expressed in
    pub measurement_unit: String,
}

/// Stored recipe without its lines
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recipe {
    /// Unique identifier
    pub id: i64,
    /// Owning user
    pub author_id: i64,
    /// Title, at most 256 characters
    pub name: String,
    /// Free-form description
    pub text: String,
    /// Minutes, at least 1
    pub cooking_time: i64,
    /// Media path of the picture, relative to the media root
    pub image: String,
    /// Publication time; lists are ordered newest first
    pub created_at: DateTime<Utc>,
}

/// A recipe line joined with its ingredient
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecipeIngredientLine {
    /// Ingredient identifier
    pub id: i64,
    /// Ingredient name
    pub name: String,
    /// Ingredient unit
    pub measurement_unit: String,
    /// Amount in `measurement_unit`
    pub amount: i64,
}

/// (ingredient, amount) pair as submitted by clients
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngredientAmount {
    /// Ingredient identifier
    pub id: i64,
    /// Amount, at least 1
    pub amount: i64,
}

/// Everything needed to create a recipe
#[derive(Debug, Clone)]
pub struct RecipeDraft {
    /// Title
    pub name: String,
    /// Description
    pub text: String,
    /// Minutes
    pub cooking_time: i64,
    /// Picture; required on create
    pub image: Option<ImageUpload>,
    /// Ordered lines
    pub ingredients: Vec<IngredientAmount>,
}

/// Partial update; `ingredients` must be present on every update
#[derive(Debug, Clone, Default)]
pub struct RecipeUpdate {
    /// New title
    pub name: Option<String>,
    /// New description
    pub text: Option<String>,
    /// New cooking time
    pub cooking_time: Option<i64>,
    /// Replacement picture; the current one is kept when absent
    pub image: Option<ImageUpload>,
    /// Full replacement line set
    pub ingredients: Option<Vec<IngredientAmount>>,
}
