//! Project entity model.

use authorly_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    /// `"document"` or `"presentation"`. Immutable after creation; parse via
    /// [`authorly_core::document::DocKind`] where behaviour depends on it.
    pub doc_kind: String,
    pub topic_prompt: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Input for inserting a new project.
#[derive(Debug, Clone)]
pub struct CreateProject {
    pub user_id: DbId,
    pub title: String,
    pub doc_kind: String,
    pub topic_prompt: Option<String>,
}

/// Input for updating a project. Only non-`None` fields are applied; the
/// document kind is deliberately absent.
#[derive(Debug, Clone, Default)]
pub struct UpdateProject {
    pub title: Option<String>,
    pub topic_prompt: Option<String>,
}
