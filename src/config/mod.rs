// ABOUTME: Configuration management module for centralized server settings
// ABOUTME: Environment-only configuration: ports, database, auth, media and pagination
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! Configuration module for the Foodgram server
//!
//! All settings come from environment variables; there is no config file.

/// Environment and server configuration
pub mod environment;
