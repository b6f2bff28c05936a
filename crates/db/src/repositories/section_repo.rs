//! Repository for the `sections` table.

use authorly_core::types::DbId;
use sqlx::PgPool;

use crate::models::section::{CreateSection, Section, UpdateSection};

const COLUMNS: &str =
    "id, project_id, idx, title, content, initial_generated, created_at, updated_at";

/// Qualified column list for queries that join `projects`.
const QUALIFIED_COLUMNS: &str = "s.id, s.project_id, s.idx, s.title, s.content, \
     s.initial_generated, s.created_at, s.updated_at";

/// Provides CRUD operations for sections.
pub struct SectionRepo;

impl SectionRepo {
    /// Insert a new section, returning the created row. Accepts any executor
    /// so the initial-generation pass can insert inside one transaction.
    pub async fn create<'e, E>(executor: E, input: &CreateSection) -> Result<Section, sqlx::Error>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO sections (project_id, idx, title, content, initial_generated)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Section>(&query)
            .bind(input.project_id)
            .bind(input.idx)
            .bind(&input.title)
            .bind(&input.content)
            .bind(input.initial_generated)
            .fetch_one(executor)
            .await
    }

    /// Find a section by ID, scoped to a project owned by `user_id`.
    ///
    /// The ownership join makes a foreign user's section indistinguishable
    /// from a missing one.
    pub async fn find_for_user(
        pool: &PgPool,
        section_id: DbId,
        project_id: DbId,
        user_id: DbId,
    ) -> Result<Option<Section>, sqlx::Error> {
        let query = format!(
            "SELECT {QUALIFIED_COLUMNS}
             FROM sections s
             JOIN projects p ON p.id = s.project_id
             WHERE s.id = $1 AND s.project_id = $2 AND p.user_id = $3"
        );
        sqlx::query_as::<_, Section>(&query)
            .bind(section_id)
            .bind(project_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List a project's sections ordered by position, with optional
    /// title/content search and an initially-generated filter.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
        search: Option<&str>,
        initial_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Section>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sections
             WHERE project_id = $1
               AND ($2::TEXT IS NULL OR title ILIKE '%' || $2 || '%'
                    OR content ILIKE '%' || $2 || '%')
               AND (NOT $3 OR initial_generated)
             ORDER BY idx ASC
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, Section>(&query)
            .bind(project_id)
            .bind(search)
            .bind(initial_only)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count the rows [`Self::list_for_project`] would match before
    /// pagination.
    pub async fn count_for_project(
        pool: &PgPool,
        project_id: DbId,
        search: Option<&str>,
        initial_only: bool,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM sections
             WHERE project_id = $1
               AND ($2::TEXT IS NULL OR title ILIKE '%' || $2 || '%'
                    OR content ILIKE '%' || $2 || '%')
               AND (NOT $3 OR initial_generated)",
        )
        .bind(project_id)
        .bind(search)
        .bind(initial_only)
        .fetch_one(pool)
        .await
    }

    /// All of a project's sections in render order (for export).
    pub async fn list_ordered(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Section>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM sections WHERE project_id = $1 ORDER BY idx ASC");
        sqlx::query_as::<_, Section>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Update a section's fields. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSection,
    ) -> Result<Option<Section>, sqlx::Error> {
        let query = format!(
            "UPDATE sections SET
                title = COALESCE($2, title),
                content = COALESCE($3, content),
                idx = COALESCE($4, idx),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Section>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.content)
            .bind(input.idx)
            .fetch_optional(pool)
            .await
    }

    /// Overwrite a section's content. Accepts any executor so the
    /// orchestrator can pair it with a revision insert in one transaction.
    pub async fn set_content<'e, E>(
        executor: E,
        id: DbId,
        content: &str,
    ) -> Result<(), sqlx::Error>
    where
        E: sqlx::PgExecutor<'e>,
    {
        sqlx::query("UPDATE sections SET content = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(content)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Delete a section and, via cascade, its revisions, comments, and
    /// feedback. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sections WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
