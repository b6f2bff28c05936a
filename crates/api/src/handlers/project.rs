//! Handlers for the `/projects` resource.

use authorly_core::document::DocKind;
use authorly_core::error::CoreError;
use authorly_core::types::DbId;
use authorly_db::models::project::{CreateProject, Project, UpdateProject};
use authorly_db::models::section::Section;
use authorly_db::repositories::ProjectRepo;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::generation::{GenerateProjectRequest, Orchestrator};
use crate::middleware::auth::AuthUser;
use crate::query::PageParams;
use crate::response::Page;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /projects`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    /// `document` or `presentation`. Immutable after creation.
    pub doc_kind: DocKind,
    #[validate(length(max = 1000))]
    pub topic_prompt: Option<String>,
}

/// Request body for `PUT /projects/{id}`. The document kind is deliberately
/// not updatable.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProjectRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[validate(length(max = 1000))]
    pub topic_prompt: Option<String>,
}

/// Query parameters for `GET /projects`.
#[derive(Debug, Deserialize)]
pub struct ProjectListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    /// Case-insensitive title search.
    pub search: Option<String>,
    /// Filter by document kind.
    pub doc_kind: Option<String>,
}

impl ProjectListQuery {
    fn page_params(&self) -> PageParams {
        PageParams {
            page: self.page,
            size: self.size,
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/projects
pub async fn create(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<CreateProjectRequest>,
) -> AppResult<(StatusCode, Json<Project>)> {
    input.validate()?;

    let project = ProjectRepo::create(
        &state.pool,
        &CreateProject {
            user_id: auth_user.user_id,
            title: input.title,
            doc_kind: input.doc_kind.as_str().to_string(),
            topic_prompt: input.topic_prompt,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/v1/projects
pub async fn list(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(query): Query<ProjectListQuery>,
) -> AppResult<Json<Page<Project>>> {
    // An unknown kind filter is a caller error, not an empty result.
    if let Some(kind) = query.doc_kind.as_deref() {
        DocKind::parse(kind).map_err(AppError::Core)?;
    }

    let search = query.search.as_deref();
    let doc_kind = query.doc_kind.as_deref();
    let page = query.page_params();

    let items = ProjectRepo::list_for_user(
        &state.pool,
        auth_user.user_id,
        search,
        doc_kind,
        page.size(),
        page.offset(),
    )
    .await?;
    let total = ProjectRepo::count_for_user(&state.pool, auth_user.user_id, search, doc_kind).await?;

    Ok(Json(Page {
        items,
        total,
        page: page.page(),
        size: page.size(),
    }))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Project>> {
    let project = ProjectRepo::find_for_user(&state.pool, id, auth_user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    Ok(Json(project))
}

/// PUT /api/v1/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProjectRequest>,
) -> AppResult<Json<Project>> {
    input.validate()?;

    let project = ProjectRepo::update(
        &state.pool,
        id,
        auth_user.user_id,
        &UpdateProject {
            title: input.title,
            topic_prompt: input.topic_prompt,
        },
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "Project",
        id,
    }))?;
    Ok(Json(project))
}

/// DELETE /api/v1/projects/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = ProjectRepo::delete(&state.pool, id, auth_user.user_id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))
    }
}

/// POST /api/v1/projects/{id}/generate
///
/// Generate the project's initial sections via the LLM provider.
pub async fn generate(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<GenerateProjectRequest>,
) -> AppResult<(StatusCode, Json<Vec<Section>>)> {
    input.validate()?;

    let orchestrator = Orchestrator::new(state.pool.clone(), state.llm.clone());
    let sections = orchestrator
        .generate_initial_content(id, auth_user.user_id, &input)
        .await?;

    Ok((StatusCode::CREATED, Json(sections)))
}
