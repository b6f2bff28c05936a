//! Comment entity model.

use authorly_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A comment row from the `comments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub section_id: DbId,
    pub user_id: DbId,
    pub body: String,
    pub created_at: Timestamp,
}

/// Input for inserting a new comment.
#[derive(Debug, Clone)]
pub struct CreateComment {
    pub section_id: DbId,
    pub user_id: DbId,
    pub body: String,
}
