//! Feedback entity model. At most one row per section, upserted.

use authorly_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A feedback row from the `feedback` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Feedback {
    pub id: DbId,
    pub section_id: DbId,
    pub user_id: DbId,
    pub liked: bool,
    pub created_at: Timestamp,
}

/// Input for upserting a section's feedback record.
#[derive(Debug, Clone)]
pub struct UpsertFeedback {
    pub section_id: DbId,
    pub user_id: DbId,
    pub liked: bool,
}
