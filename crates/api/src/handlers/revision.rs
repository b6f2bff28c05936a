//! Handlers for the revision history of a section. Read-only: revisions are
//! append-only records created by the generation orchestrator.

use authorly_core::types::DbId;
use authorly_db::models::revision::Revision;
use authorly_db::repositories::RevisionRepo;
use axum::extract::{Path, State};
use axum::Json;

use crate::error::AppResult;
use crate::handlers::section::require_section;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/v1/projects/{project_id}/sections/{id}/revisions
///
/// The section's revision history, newest first.
pub async fn list(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path((project_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<Vec<Revision>>> {
    require_section(&state, project_id, id, auth_user.user_id).await?;

    let revisions = RevisionRepo::list_for_section(&state.pool, id).await?;
    Ok(Json(revisions))
}
