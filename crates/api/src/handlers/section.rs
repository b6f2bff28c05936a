//! Handlers for the `/projects/{project_id}/sections` resource.

use authorly_core::error::CoreError;
use authorly_core::types::DbId;
use authorly_db::models::section::{CreateSection, Section, UpdateSection};
use authorly_db::repositories::{
    CommentRepo, FeedbackRepo, ProjectRepo, RevisionRepo, SectionRepo,
};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::generation::{GenerateSectionRequest, Orchestrator, RefineSectionRequest};
use crate::middleware::auth::AuthUser;
use crate::query::PageParams;
use crate::response::Page;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /projects/{project_id}/sections`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSectionRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    pub content: Option<String>,
    /// Position in the document.
    #[validate(range(min = 0))]
    pub idx: i32,
}

/// Request body for `PUT .../sections/{id}`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSectionRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    pub content: Option<String>,
    #[validate(range(min = 0))]
    pub idx: Option<i32>,
}

/// Query parameters for `GET /projects/{project_id}/sections`.
#[derive(Debug, Deserialize)]
pub struct SectionListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    /// Case-insensitive search over title and content.
    pub search: Option<String>,
    /// Only return sections created by the initial generation pass.
    #[serde(default)]
    pub initial_only: bool,
}

/// A section plus attachment counts, returned by the single-section GET.
#[derive(Debug, Serialize)]
pub struct SectionDetail {
    #[serde(flatten)]
    pub section: Section,
    pub revision_count: i64,
    pub comment_count: i64,
    pub has_feedback: bool,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/projects/{project_id}/sections
pub async fn create(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateSectionRequest>,
) -> AppResult<(StatusCode, Json<Section>)> {
    input.validate()?;
    require_project(&state, project_id, auth_user.user_id).await?;

    let mut tx = state.pool.begin().await?;
    let section = SectionRepo::create(
        &mut *tx,
        &CreateSection {
            project_id,
            idx: input.idx,
            title: input.title,
            content: input.content,
            initial_generated: false,
        },
    )
    .await?;
    ProjectRepo::touch(&mut *tx, project_id).await?;
    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(section)))
}

/// GET /api/v1/projects/{project_id}/sections
pub async fn list(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(project_id): Path<DbId>,
    Query(query): Query<SectionListQuery>,
) -> AppResult<Json<Page<Section>>> {
    require_project(&state, project_id, auth_user.user_id).await?;

    let page = PageParams {
        page: query.page,
        size: query.size,
    };
    let search = query.search.as_deref();

    let items = SectionRepo::list_for_project(
        &state.pool,
        project_id,
        search,
        query.initial_only,
        page.size(),
        page.offset(),
    )
    .await?;
    let total =
        SectionRepo::count_for_project(&state.pool, project_id, search, query.initial_only).await?;

    Ok(Json(Page {
        items,
        total,
        page: page.page(),
        size: page.size(),
    }))
}

/// GET /api/v1/projects/{project_id}/sections/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<SectionDetail>> {
    let section = require_section(&state, project_id, id, auth_user.user_id).await?;

    let revision_count = RevisionRepo::count_for_section(&state.pool, section.id).await?;
    let comment_count = CommentRepo::count_for_section(&state.pool, section.id).await?;
    let has_feedback = FeedbackRepo::find_for_section(&state.pool, section.id)
        .await?
        .is_some();

    Ok(Json(SectionDetail {
        section,
        revision_count,
        comment_count,
        has_feedback,
    }))
}

/// PUT /api/v1/projects/{project_id}/sections/{id}
pub async fn update(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((project_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateSectionRequest>,
) -> AppResult<Json<Section>> {
    input.validate()?;
    require_section(&state, project_id, id, auth_user.user_id).await?;

    let section = SectionRepo::update(
        &state.pool,
        id,
        &UpdateSection {
            title: input.title,
            content: input.content,
            idx: input.idx,
        },
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "Section",
        id,
    }))?;

    ProjectRepo::touch(&state.pool, project_id).await?;

    Ok(Json(section))
}

/// DELETE /api/v1/projects/{project_id}/sections/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    require_section(&state, project_id, id, auth_user.user_id).await?;

    SectionRepo::delete(&state.pool, id).await?;
    ProjectRepo::touch(&state.pool, project_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/projects/{project_id}/sections/{id}/generate
///
/// Generate content for the section from a user prompt.
pub async fn generate(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((project_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<GenerateSectionRequest>,
) -> AppResult<Json<Section>> {
    input.validate()?;

    let orchestrator = Orchestrator::new(state.pool.clone(), state.llm.clone());
    let section = orchestrator
        .generate_section_content(project_id, id, auth_user.user_id, &input)
        .await?;

    Ok(Json(section))
}

/// POST /api/v1/projects/{project_id}/sections/{id}/refine
///
/// Refine the section's content from a refinement instruction.
pub async fn refine(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((project_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<RefineSectionRequest>,
) -> AppResult<Json<Section>> {
    input.validate()?;

    let orchestrator = Orchestrator::new(state.pool.clone(), state.llm.clone());
    let section = orchestrator
        .refine_section_content(project_id, id, auth_user.user_id, &input)
        .await?;

    Ok(Json(section))
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Load a project owned by `user_id` or fail with `NotFound`.
pub(crate) async fn require_project(
    state: &AppState,
    project_id: DbId,
    user_id: DbId,
) -> AppResult<authorly_db::models::project::Project> {
    ProjectRepo::find_for_user(&state.pool, project_id, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))
}

/// Load a section within a project owned by `user_id` or fail with `NotFound`.
pub(crate) async fn require_section(
    state: &AppState,
    project_id: DbId,
    section_id: DbId,
    user_id: DbId,
) -> AppResult<Section> {
    SectionRepo::find_for_user(&state.pool, section_id, project_id, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Section",
            id: section_id,
        }))
}
