//! Bounded pagination primitives shared by list operations.

use serde::{Deserialize, Serialize};

/// Validated page request with a bounded page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    page: u32,
    per_page: u32,
}

impl PageRequest {
    /// Page size applied when the caller does not request one.
    pub const DEFAULT_PER_PAGE: u32 = 15;

    /// Largest page size a caller may request.
    pub const MAX_PER_PAGE: u32 = 100;

    /// Creates a page request, clamping the page size to `[1, 100]` and the
    /// page number to at least 1. Unset values fall back to defaults.
    #[must_use]
    pub fn new(page: Option<u32>, per_page: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page
                .unwrap_or(Self::DEFAULT_PER_PAGE)
                .clamp(1, Self::MAX_PER_PAGE),
        }
    }

    /// Returns the 1-based page number.
    #[must_use]
    pub const fn page(self) -> u32 {
        self.page
    }

    /// Returns the bounded page size.
    #[must_use]
    pub const fn per_page(self) -> u32 {
        self.per_page
    }

    /// Returns the number of rows preceding this page.
    #[must_use]
    pub const fn offset(self) -> usize {
        ((self.page - 1) as usize) * (self.per_page as usize)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of results together with the total row count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageOf<T> {
    /// Rows on this page, in repository order.
    pub items: Vec<T>,
    /// Total rows matching the scope and filter across all pages.
    pub total: u64,
    /// 1-based page number that was served.
    pub page: u32,
    /// Page size that was applied.
    pub per_page: u32,
}

impl<T> PageOf<T> {
    /// Assembles a page from already-sliced rows.
    #[must_use]
    pub const fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page(),
            per_page: request.per_page(),
        }
    }
}
