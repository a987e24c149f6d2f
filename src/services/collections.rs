// ABOUTME: Favorite and shopping cart toggle business logic
// ABOUTME: Resolves the recipe, then adds or removes the user-scoped row
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use tracing::info;

use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::{CollectionEntry, Recipe, RecipeCollection};

async fn resolve_recipe(database: &Database, recipe_id: i64) -> AppResult<Recipe> {
    database
        .recipes()
        .get(recipe_id)
        .await?
        .ok_or_else(|| AppError::not_found("Recipe"))
}

/// Add a recipe to one of the user's collections
///
/// # Errors
///
/// `ResourceNotFound` for an unknown recipe, `AlreadyExists` when the recipe
/// is already collected
pub async fn add_to_collection(
    database: &Database,
    collection: RecipeCollection,
    user_id: i64,
    recipe_id: i64,
) -> AppResult<(CollectionEntry, Recipe)> {
    let recipe = resolve_recipe(database, recipe_id).await?;
    let entry = database
        .collections()
        .add(collection, user_id, recipe.id)
        .await?;
    info!(user.id = user_id, recipe.id = recipe_id, %collection, "Recipe collected");
    Ok((entry, recipe))
}

/// Remove a recipe from one of the user's collections
///
/// # Errors
///
/// `ResourceNotFound` for an unknown recipe, `RelationNotFound` when the
/// recipe is not collected
pub async fn remove_from_collection(
    database: &Database,
    collection: RecipeCollection,
    user_id: i64,
    recipe_id: i64,
) -> AppResult<()> {
    let recipe = resolve_recipe(database, recipe_id).await?;
    database
        .collections()
        .remove(collection, user_id, recipe.id)
        .await?;
    info!(user.id = user_id, recipe.id = recipe_id, %collection, "Recipe removed from collection");
    Ok(())
}
