// ABOUTME: Core data models for the recipe API
// ABOUTME: Re-exports users, ingredients, recipes and the user-scoped relation types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! # Data Models
//!
//! Plain data carried between the database managers, the services and the
//! HTTP layer. Row types mirror the tables one to one; request and response
//! shapes live next to the routes that use them.
//!
//! ## Core Models
//!
//! - `User`: account with unique email and username
//! - `Ingredient`: catalogue entry identified by name and measurement unit
//! - `Recipe` and `RecipeIngredientLine`: a recipe with its ordered lines
//! - `RecipeCollection`: favorites or shopping cart, the two user-scoped sets
//! - `ShoppingList`: aggregated cart contents ready for rendering

mod recipe;
mod social;
mod user;

pub use recipe::{
    Ingredient, IngredientAmount, NewIngredient, Recipe, RecipeDraft, RecipeIngredientLine,
    RecipeUpdate,
};
pub use social::{
    CartRecipe, CollectionEntry, FollowedAuthor, RecipeCollection, ShoppingList,
    ShoppingListItem, Subscription,
};
pub use user::{NewUser, User};
