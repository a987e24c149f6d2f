// ABOUTME: Page-number pagination for list endpoints
// ABOUTME: Resolves page/limit query parameters and builds count/next/previous envelopes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use serde::{Deserialize, Serialize};

use crate::constants::pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Raw pagination parameters as they arrive in the query string
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
    /// 1-based page number
    pub page: Option<u32>,
    /// Page size
    pub limit: Option<u32>,
}

impl PageParams {
    /// Resolve into a concrete request, clamping page and limit
    #[must_use]
    pub fn resolve(self, default_limit: u32) -> PageRequest {
        let default_limit = if default_limit == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            default_limit
        };
        PageRequest {
            page: self.page.unwrap_or(1).max(1),
            limit: self.limit.unwrap_or(default_limit).clamp(1, MAX_PAGE_SIZE),
        }
    }
}

/// A resolved page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number
    pub page: u32,
    /// Page size
    pub limit: u32,
}

impl PageRequest {
    /// SQL `LIMIT`
    #[must_use]
    pub const fn limit(&self) -> i64 {
        self.limit as i64
    }

    /// SQL `OFFSET`
    #[must_use]
    pub const fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.limit as i64
    }
}

/// Paginated list envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// Total number of matching rows
    pub count: i64,
    /// Link to the next page
    pub next: Option<String>,
    /// Link to the previous page
    pub previous: Option<String>,
    /// Rows on this page
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Build a page; `link_base` is the list URL including any filter query
    pub fn new(results: Vec<T>, count: i64, request: PageRequest, link_base: &str) -> Self {
        let separator = if link_base.contains('?') { '&' } else { '?' };
        let link = |page: u32| {
            format!(
                "{link_base}{separator}page={page}&limit={}",
                request.limit
            )
        };

        let shown_through = i64::from(request.page) * i64::from(request.limit);
        let next = (shown_through < count).then(|| link(request.page + 1));
        let previous = (request.page > 1).then(|| link(request.page - 1));

        Self {
            count,
            next,
            previous,
            results,
        }
    }

    /// Transform the rows while keeping the links
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            next: self.next,
            previous: self.previous,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}
