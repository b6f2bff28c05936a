//! Repository for the `feedback` table.

use authorly_core::types::DbId;
use sqlx::PgPool;

use crate::models::feedback::{Feedback, UpsertFeedback};

const COLUMNS: &str = "id, section_id, user_id, liked, created_at";

pub struct FeedbackRepo;

impl FeedbackRepo {
    /// Insert or replace a section's feedback record (one per section,
    /// enforced by `uq_feedback_section`).
    pub async fn upsert(pool: &PgPool, input: &UpsertFeedback) -> Result<Feedback, sqlx::Error> {
        let query = format!(
            "INSERT INTO feedback (section_id, user_id, liked)
             VALUES ($1, $2, $3)
             ON CONFLICT ON CONSTRAINT uq_feedback_section
             DO UPDATE SET user_id = EXCLUDED.user_id, liked = EXCLUDED.liked
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Feedback>(&query)
            .bind(input.section_id)
            .bind(input.user_id)
            .bind(input.liked)
            .fetch_one(pool)
            .await
    }

    /// Find a section's feedback record, if any.
    pub async fn find_for_section(
        pool: &PgPool,
        section_id: DbId,
    ) -> Result<Option<Feedback>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM feedback WHERE section_id = $1");
        sqlx::query_as::<_, Feedback>(&query)
            .bind(section_id)
            .fetch_optional(pool)
            .await
    }
}
