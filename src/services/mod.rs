// ABOUTME: Domain service layer for business logic extracted from route handlers
// ABOUTME: Recipe persistence, collections, subscriptions, shopping lists, users and imports
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! Domain service layer
//!
//! Business rules live here as free functions over the database managers.
//! The acting user is always passed in explicitly; nothing reads request
//! state.

/// Favorites and shopping cart add/remove
pub mod collections;

/// Best-effort batch load of the ingredient catalogue
pub mod ingredient_import;

/// Recipe create, update, delete and detail assembly
pub mod recipes;

/// Cart aggregation and text report
pub mod shopping_list;

/// Follow, unfollow and followed-author listing
pub mod subscriptions;

/// Registration, password change and avatars
pub mod users;
