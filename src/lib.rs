// ABOUTME: Main library entry point for the Foodgram recipe sharing API
// ABOUTME: Recipes, ingredients, favorites, subscriptions and shopping lists over HTTP
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

#![deny(unsafe_code)]

//! # Foodgram Server
//!
//! A recipe sharing backend. Users register, publish recipes with ingredient
//! lists and images, mark favorites, subscribe to authors and download a
//! shopping list summed over the recipes in their cart.
//!
//! ## Architecture
//!
//! - **database**: `SQLite` schema and per-domain managers
//! - **services**: business rules (recipe persistence, shopping list
//!   aggregation, collection toggles, subscriptions, ingredient import)
//! - **routes**: axum handlers, thin wrappers over services
//! - **media**: image upload decoding, validation and storage
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use foodgram_server::config::environment::ServerConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Foodgram configured with port {}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Authentication: JWT issuing/validation and password hashing
pub mod auth;

/// Configuration management
pub mod config;

/// Application constants
pub mod constants;

/// `SQLite` storage
pub mod database;

/// Unified error handling system
pub mod errors;

/// Production logging and structured output
pub mod logging;

/// Image uploads: decoding, validation and storage
pub mod media;

/// Domain data models
pub mod models;

/// Shared server resources handed to route handlers
pub mod resources;

/// HTTP routes organized by domain
pub mod routes;

/// HTTP server assembly and lifecycle
pub mod server;

/// Business logic services
pub mod services;

/// Page-number pagination
pub mod pagination;
