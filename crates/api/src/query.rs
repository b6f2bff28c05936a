//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Default page size for list endpoints.
const DEFAULT_PAGE_SIZE: i64 = 10;
/// Upper bound on page size.
const MAX_PAGE_SIZE: i64 = 100;

/// Generic pagination parameters (`?page=&size=`), 1-based.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

impl PageParams {
    /// The 1-based page number, floored at 1.
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// The page size, clamped to `[1, 100]`.
    pub fn size(&self) -> i64 {
        self.size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    /// The SQL offset implied by page and size.
    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.size()
    }
}
