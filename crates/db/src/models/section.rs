//! Section entity model.

use authorly_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A section row from the `sections` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Section {
    pub id: DbId,
    pub project_id: DbId,
    /// Render position. Stable under sort, not required to be contiguous.
    pub idx: i32,
    pub title: String,
    pub content: Option<String>,
    pub initial_generated: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Input for inserting a new section.
#[derive(Debug, Clone)]
pub struct CreateSection {
    pub project_id: DbId,
    pub idx: i32,
    pub title: String,
    pub content: Option<String>,
    pub initial_generated: bool,
}

/// Input for updating a section. Only non-`None` fields are applied.
#[derive(Debug, Clone, Default)]
pub struct UpdateSection {
    pub title: Option<String>,
    pub content: Option<String>,
    pub idx: Option<i32>,
}
