// ABOUTME: User-scoped relation models
// ABOUTME: Favorites and shopping cart collections, subscriptions and shopping list rows
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

use super::User;

/// The two per-user recipe sets sharing the add/remove contract
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RecipeCollection {
    /// Recipes the user marked as favorite
    Favorites,
    /// Recipes the user plans to shop for
    ShoppingCart,
}

impl RecipeCollection {
    /// Backing table
    #[must_use]
    pub const fn table(self) -> &'static str {
        match self {
            Self::Favorites => "favorites",
            Self::ShoppingCart => "shopping_cart",
        }
    }

    /// Human-readable name used in error messages
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Favorites => "favorites",
            Self::ShoppingCart => "shopping cart",
        }
    }
}

impl Display for RecipeCollection {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.label())
    }
}

/// A (user, recipe) row of a collection
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CollectionEntry {
    /// Row identifier; also the insertion order
    pub id: i64,
    /// Owning user
    pub user_id: i64,
    /// Collected recipe
    pub recipe_id: i64,
}

/// Directed follow relation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Subscription {
    /// Row identifier
    pub id: i64,
    /// Follower
    pub user_id: i64,
    /// Followed author
    pub author_id: i64,
}

/// Followed author with the number of recipes they published
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowedAuthor {
    /// The author
    pub author: User,
    /// Total recipes by the author
    pub recipes_count: i64,
}

/// One aggregated shopping list line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShoppingListItem {
    /// Ingredient name as stored
    pub name: String,
    /// Ingredient unit
    pub measurement_unit: String,
    /// Sum of amounts across the cart
    pub total_amount: i64,
}

/// A recipe in the cart with the author name shown in the report
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartRecipe {
    /// Recipe identifier
    pub recipe_id: i64,
    /// Recipe title
    pub name: String,
    /// Author full name, or username when no name is set
    pub author_name: String,
}

/// Aggregated cart contents
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShoppingList {
    /// Lines ordered by name then unit
    pub items: Vec<ShoppingListItem>,
    /// Recipes in the order they were added to the cart
    pub recipes: Vec<CartRecipe>,
}
