//! Repository for the `revisions` table. Insert and read only; revisions are
//! an append-only history log.

use authorly_core::types::DbId;
use sqlx::PgPool;

use crate::models::revision::{CreateRevision, Revision};

const COLUMNS: &str = "id, section_id, user_id, prompt, generated_content, created_at";

pub struct RevisionRepo;

impl RevisionRepo {
    /// Append a new revision, returning the created row. Accepts any executor
    /// so the orchestrator can pair it with the content write in one
    /// transaction.
    pub async fn create<'e, E>(executor: E, input: &CreateRevision) -> Result<Revision, sqlx::Error>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO revisions (section_id, user_id, prompt, generated_content)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Revision>(&query)
            .bind(input.section_id)
            .bind(input.user_id)
            .bind(&input.prompt)
            .bind(&input.generated_content)
            .fetch_one(executor)
            .await
    }

    /// List a section's revisions, newest first.
    pub async fn list_for_section(
        pool: &PgPool,
        section_id: DbId,
    ) -> Result<Vec<Revision>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM revisions WHERE section_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Revision>(&query)
            .bind(section_id)
            .fetch_all(pool)
            .await
    }

    /// Count a section's revisions.
    pub async fn count_for_section(pool: &PgPool, section_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM revisions WHERE section_id = $1")
            .bind(section_id)
            .fetch_one(pool)
            .await
    }
}
