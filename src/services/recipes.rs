// ABOUTME: Recipe persistence business logic extracted from route handlers
// ABOUTME: Validates drafts and updates, stores images, enforces authorship, assembles details
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use std::collections::HashSet;

use tracing::info;

use crate::constants::limits::{
    MAX_COOKING_TIME, MAX_INGREDIENT_AMOUNT, MIN_COOKING_TIME, MIN_INGREDIENT_AMOUNT,
    RECIPE_NAME_MAX_LENGTH,
};
use crate::constants::media::RECIPES_DIR;
use crate::database::{Database, RecipeRecord};
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use crate::media::MediaStore;
use crate::models::{
    IngredientAmount, Recipe, RecipeCollection, RecipeDraft, RecipeIngredientLine, RecipeUpdate,
    User,
};

/// A recipe with everything its representation needs
#[derive(Debug, Clone)]
pub struct RecipeDetails {
    /// Stored recipe
    pub recipe: Recipe,
    /// Author account
    pub author: User,
    /// Whether the viewer follows the author
    pub author_is_subscribed: bool,
    /// Lines in insertion order
    pub ingredients: Vec<RecipeIngredientLine>,
    /// Whether the viewer favorited the recipe
    pub is_favorited: bool,
    /// Whether the recipe is in the viewer's cart
    pub is_in_shopping_cart: bool,
}

/// Check ingredient lines: non-empty, unique IDs, amounts within bounds
///
/// # Errors
///
/// `InvalidInput` on the `ingredients` field
pub fn validate_ingredient_lines(lines: &[IngredientAmount]) -> AppResult<()> {
    if lines.is_empty() {
        return Err(AppError::invalid_field(
            "ingredients",
            "at least one ingredient required",
        ));
    }

    let mut seen = HashSet::with_capacity(lines.len());
    for line in lines {
        if !seen.insert(line.id) {
            return Err(AppError::invalid_field("ingredients", "duplicate ingredient"));
        }
        if line.amount < MIN_INGREDIENT_AMOUNT {
            return Err(AppError::invalid_field(
                "ingredients",
                format!("amount must be at least {MIN_INGREDIENT_AMOUNT}"),
            ));
        }
        if line.amount > MAX_INGREDIENT_AMOUNT {
            return Err(AppError::invalid_field(
                "ingredients",
                format!("amount must be at most {MAX_INGREDIENT_AMOUNT}"),
            ));
        }
    }
    Ok(())
}

fn validate_fields(name: &str, text: &str, cooking_time: i64) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::invalid_field("name", "this field may not be blank"));
    }
    if name.chars().count() > RECIPE_NAME_MAX_LENGTH {
        return Err(AppError::invalid_field(
            "name",
            format!("must be at most {RECIPE_NAME_MAX_LENGTH} characters"),
        ));
    }
    if text.trim().is_empty() {
        return Err(AppError::invalid_field("text", "this field may not be blank"));
    }
    if cooking_time < MIN_COOKING_TIME {
        return Err(AppError::invalid_field(
            "cooking_time",
            format!("must be at least {MIN_COOKING_TIME}"),
        ));
    }
    if cooking_time > MAX_COOKING_TIME {
        return Err(AppError::invalid_field(
            "cooking_time",
            format!("must be at most {MAX_COOKING_TIME}"),
        ));
    }
    Ok(())
}

/// Create a recipe with its lines
///
/// All field validation happens before the image is written or any row is
/// inserted. The stored image is removed again if the insert fails.
///
/// # Errors
///
/// Validation errors, unknown ingredients, storage or database failures
pub async fn create_recipe(
    database: &Database,
    media: &MediaStore,
    author_id: i64,
    draft: RecipeDraft,
) -> AppResult<Recipe> {
    validate_fields(&draft.name, &draft.text, draft.cooking_time)?;
    validate_ingredient_lines(&draft.ingredients)?;
    let image = draft
        .image
        .ok_or_else(|| AppError::invalid_field("image", "image is required"))?;
    media.validator().validate(&image)?;

    let image_path = media.save(RECIPES_DIR, &image).await?;
    let record = RecipeRecord {
        name: draft.name,
        text: draft.text,
        cooking_time: draft.cooking_time,
        image: image_path,
    };

    match database
        .recipes()
        .create(author_id, &record, &draft.ingredients)
        .await
    {
        Ok(recipe) => {
            AppLogger::log_recipe_event(author_id, recipe.id, "created");
            Ok(recipe)
        }
        Err(e) => {
            media.delete(&record.image).await;
            Err(e)
        }
    }
}

/// Fetch a recipe and check the caller wrote it
///
/// # Errors
///
/// `ResourceNotFound` or `PermissionDenied`
pub async fn get_owned_recipe(database: &Database, user_id: i64, recipe_id: i64) -> AppResult<Recipe> {
    let recipe = database
        .recipes()
        .get(recipe_id)
        .await?
        .ok_or_else(|| AppError::not_found("Recipe"))?;

    if recipe.author_id != user_id {
        return Err(AppError::permission_denied(
            "Only the author can change this recipe",
        ));
    }
    Ok(recipe)
}

/// Apply a partial update and replace every ingredient line
///
/// `ingredients` must be present. Omitted scalar fields and the image keep
/// their stored values.
///
/// # Errors
///
/// `ResourceNotFound`, `PermissionDenied`, validation errors, storage or
/// database failures; the stored recipe is unchanged on error
pub async fn update_recipe(
    database: &Database,
    media: &MediaStore,
    user_id: i64,
    recipe_id: i64,
    changes: RecipeUpdate,
) -> AppResult<Recipe> {
    let current = get_owned_recipe(database, user_id, recipe_id).await?;

    let lines = changes
        .ingredients
        .ok_or_else(|| AppError::missing_field("ingredients", "this field is required"))?;
    let name = changes.name.unwrap_or(current.name);
    let text = changes.text.unwrap_or(current.text);
    let cooking_time = changes.cooking_time.unwrap_or(current.cooking_time);
    validate_fields(&name, &text, cooking_time)?;
    validate_ingredient_lines(&lines)?;
    if let Some(image) = &changes.image {
        media.validator().validate(image)?;
    }

    let new_image = match &changes.image {
        Some(image) => Some(media.save(RECIPES_DIR, image).await?),
        None => None,
    };
    let record = RecipeRecord {
        name,
        text,
        cooking_time,
        image: new_image.clone().unwrap_or_else(|| current.image.clone()),
    };

    if let Err(e) = database.recipes().update(recipe_id, &record, &lines).await {
        if let Some(path) = &new_image {
            media.delete(path).await;
        }
        return Err(e);
    }
    if new_image.is_some() {
        media.delete(&current.image).await;
    }

    AppLogger::log_recipe_event(user_id, recipe_id, "updated");
    Ok(Recipe {
        id: recipe_id,
        author_id: current.author_id,
        name: record.name,
        text: record.text,
        cooking_time: record.cooking_time,
        image: record.image,
        created_at: current.created_at,
    })
}

/// Delete a recipe written by the caller
///
/// # Errors
///
/// `ResourceNotFound` or `PermissionDenied`
pub async fn delete_recipe(
    database: &Database,
    media: &MediaStore,
    user_id: i64,
    recipe_id: i64,
) -> AppResult<()> {
    let recipe = get_owned_recipe(database, user_id, recipe_id).await?;
    database.recipes().delete(recipe_id).await?;
    media.delete(&recipe.image).await;
    info!(user.id = user_id, recipe.id = recipe_id, "Recipe deleted");
    Ok(())
}

/// Load author, lines and viewer flags for a recipe
///
/// Flags are false for anonymous viewers.
///
/// # Errors
///
/// `ResourceNotFound` if the author vanished, database failures
pub async fn load_details(
    database: &Database,
    recipe: Recipe,
    viewer_id: Option<i64>,
) -> AppResult<RecipeDetails> {
    let author = database
        .users()
        .get(recipe.author_id)
        .await?
        .ok_or_else(|| AppError::not_found("Author"))?;
    let ingredients = database.recipes().lines(recipe.id).await?;

    let (author_is_subscribed, is_favorited, is_in_shopping_cart) = match viewer_id {
        Some(viewer) => {
            let collections = database.collections();
            (
                database.subscriptions().exists(viewer, author.id).await?,
                collections
                    .contains(RecipeCollection::Favorites, viewer, recipe.id)
                    .await?,
                collections
                    .contains(RecipeCollection::ShoppingCart, viewer, recipe.id)
                    .await?,
            )
        }
        None => (false, false, false),
    };

    Ok(RecipeDetails {
        recipe,
        author,
        author_is_subscribed,
        ingredients,
        is_favorited,
        is_in_shopping_cart,
    })
}
