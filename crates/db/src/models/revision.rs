//! Revision entity model.
//!
//! Revisions are an append-only audit log of generated content versions.
//! There are no update or delete operations anywhere in the repository layer.

use authorly_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A revision row from the `revisions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Revision {
    pub id: DbId,
    pub section_id: DbId,
    pub user_id: DbId,
    /// The caller's raw prompt or refine instruction, not the composed
    /// prompt sent to the backend.
    pub prompt: String,
    pub generated_content: String,
    pub created_at: Timestamp,
}

/// Input for appending a new revision.
#[derive(Debug, Clone)]
pub struct CreateRevision {
    pub section_id: DbId,
    pub user_id: DbId,
    pub prompt: String,
    pub generated_content: String,
}
