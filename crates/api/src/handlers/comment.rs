//! Handlers for section comments.

use authorly_core::error::CoreError;
use authorly_core::types::DbId;
use authorly_db::models::comment::{Comment, CreateComment};
use authorly_db::repositories::CommentRepo;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::section::require_section;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Request body for `POST .../sections/{id}/comments`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, max = 2000))]
    pub body: String,
}

/// GET /api/v1/projects/{project_id}/sections/{id}/comments
pub async fn list(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<Vec<Comment>>> {
    require_section(&state, project_id, id, auth_user.user_id).await?;

    let comments = CommentRepo::list_for_section(&state.pool, id).await?;
    Ok(Json(comments))
}

/// POST /api/v1/projects/{project_id}/sections/{id}/comments
pub async fn create(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((project_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<CreateCommentRequest>,
) -> AppResult<(StatusCode, Json<Comment>)> {
    input.validate()?;
    require_section(&state, project_id, id, auth_user.user_id).await?;

    let comment = CommentRepo::create(
        &state.pool,
        &CreateComment {
            section_id: id,
            user_id: auth_user.user_id,
            body: input.body,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(comment)))
}

/// DELETE /api/v1/projects/{project_id}/sections/{id}/comments/{comment_id}
pub async fn delete(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((project_id, id, comment_id)): Path<(DbId, DbId, DbId)>,
) -> AppResult<StatusCode> {
    require_section(&state, project_id, id, auth_user.user_id).await?;

    // The comment must actually hang off this section.
    let comment = CommentRepo::find_by_id(&state.pool, comment_id)
        .await?
        .filter(|c| c.section_id == id)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Comment",
            id: comment_id,
        }))?;

    CommentRepo::delete(&state.pool, comment.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
