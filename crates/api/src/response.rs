//! Shared response envelope types for API handlers.

use serde::Serialize;

/// Standard paginated list envelope: `{ items, total, page, size }`.
#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    pub items: Vec<T>,
    /// Total matching rows before pagination.
    pub total: i64,
    /// 1-based page number.
    pub page: i64,
    /// Requested page size.
    pub size: i64,
}
