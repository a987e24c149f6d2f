// ABOUTME: Re-exports the unified error system from foodgram-core
// ABOUTME: Keeps `crate::errors::AppError` paths stable across the server crate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

pub use foodgram_core::errors::*;
