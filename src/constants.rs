// ABOUTME: Re-exports application constants from foodgram-core
// ABOUTME: Domain-separated limits, media defaults and report formatting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

pub use foodgram_core::constants::*;
