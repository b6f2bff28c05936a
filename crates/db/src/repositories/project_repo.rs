//! Repository for the `projects` table.
//!
//! Every read and mutation is scoped to the owning user; a project another
//! user owns is indistinguishable from one that does not exist.

use authorly_core::types::DbId;
use sqlx::PgPool;

use crate::models::project::{CreateProject, Project, UpdateProject};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, title, doc_kind, topic_prompt, created_at, updated_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (user_id, title, doc_kind, topic_prompt)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(input.user_id)
            .bind(&input.title)
            .bind(&input.doc_kind)
            .bind(&input.topic_prompt)
            .fetch_one(pool)
            .await
    }

    /// Find a project by ID, scoped to its owner.
    pub async fn find_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's projects with optional title search and kind filter,
    /// most recently created first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        search: Option<&str>,
        doc_kind: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE user_id = $1
               AND ($2::TEXT IS NULL OR title ILIKE '%' || $2 || '%')
               AND ($3::TEXT IS NULL OR doc_kind = $3)
             ORDER BY created_at DESC
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(user_id)
            .bind(search)
            .bind(doc_kind)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count the rows [`Self::list_for_user`] would match before pagination.
    pub async fn count_for_user(
        pool: &PgPool,
        user_id: DbId,
        search: Option<&str>,
        doc_kind: Option<&str>,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM projects
             WHERE user_id = $1
               AND ($2::TEXT IS NULL OR title ILIKE '%' || $2 || '%')
               AND ($3::TEXT IS NULL OR doc_kind = $3)",
        )
        .bind(user_id)
        .bind(search)
        .bind(doc_kind)
        .fetch_one(pool)
        .await
    }

    /// Update a project's mutable fields. Only non-`None` fields in `input`
    /// are applied; `doc_kind` can never change.
    ///
    /// Returns `None` if the project does not exist or is not owned by
    /// `user_id`.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                title = COALESCE($3, title),
                topic_prompt = COALESCE($4, topic_prompt),
                updated_at = NOW()
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&input.title)
            .bind(&input.topic_prompt)
            .fetch_optional(pool)
            .await
    }

    /// Delete a project and, via cascade, all of its sections, revisions,
    /// comments, and feedback. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Bump a project's `updated_at`. Accepts any executor so it can run
    /// inside the orchestrator's transaction.
    pub async fn touch<'e, E>(executor: E, id: DbId) -> Result<(), sqlx::Error>
    where
        E: sqlx::PgExecutor<'e>,
    {
        sqlx::query("UPDATE projects SET updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(())
    }
}
