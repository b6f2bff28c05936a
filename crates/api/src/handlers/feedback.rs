//! Handlers for section feedback (one like/dislike record per section).

use authorly_core::error::CoreError;
use authorly_core::types::DbId;
use authorly_db::models::feedback::{Feedback, UpsertFeedback};
use authorly_db::repositories::FeedbackRepo;
use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::section::require_section;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Request body for `PUT .../sections/{id}/feedback`.
#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub liked: bool,
}

/// GET /api/v1/projects/{project_id}/sections/{id}/feedback
pub async fn get(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<Feedback>> {
    require_section(&state, project_id, id, auth_user.user_id).await?;

    let feedback = FeedbackRepo::find_for_section(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Feedback",
            id,
        }))?;
    Ok(Json(feedback))
}

/// PUT /api/v1/projects/{project_id}/sections/{id}/feedback
///
/// Insert or replace the section's feedback record.
pub async fn put(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((project_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<FeedbackRequest>,
) -> AppResult<Json<Feedback>> {
    require_section(&state, project_id, id, auth_user.user_id).await?;

    let feedback = FeedbackRepo::upsert(
        &state.pool,
        &UpsertFeedback {
            section_id: id,
            user_id: auth_user.user_id,
            liked: input.liked,
        },
    )
    .await?;
    Ok(Json(feedback))
}
