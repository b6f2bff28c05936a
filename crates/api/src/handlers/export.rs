//! Handler for exporting a project to a downloadable document.

use authorly_core::types::DbId;
use authorly_db::repositories::{CommentRepo, RevisionRepo, SectionRepo};
use axum::extract::{Path, Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::export::{self, ExportData, ExportFormat};
use crate::handlers::section::require_project;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Query parameters for `GET /projects/{id}/export`.
#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    /// `docx`, `pptx`, or `txt`. Defaults to `docx`.
    pub format: Option<String>,
    #[serde(default)]
    pub include_comments: bool,
    /// Only honoured by the docx and txt renderers.
    #[serde(default)]
    pub include_revision_history: bool,
}

/// GET /api/v1/projects/{id}/export
///
/// Render the project's ordered sections into the requested format and
/// return the bytes as a download.
pub async fn export(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
    Query(query): Query<ExportQuery>,
) -> AppResult<Response> {
    let format_name = query.format.as_deref().unwrap_or("docx");
    let format = ExportFormat::parse(format_name)
        .ok_or_else(|| AppError::BadRequest(format!("Unsupported export format: {format_name}")))?;

    let project = require_project(&state, id, auth_user.user_id).await?;

    let sections = SectionRepo::list_ordered(&state.pool, id).await?;
    if sections.is_empty() {
        return Err(AppError::BadRequest(
            "No sections found in the project".to_string(),
        ));
    }

    let mut comments = Vec::new();
    if query.include_comments {
        for section in &sections {
            comments.extend(CommentRepo::list_for_section(&state.pool, section.id).await?);
        }
    }

    let mut revisions = Vec::new();
    if query.include_revision_history && format != ExportFormat::Pptx {
        for section in &sections {
            revisions.extend(RevisionRepo::list_for_section(&state.pool, section.id).await?);
        }
    }

    let rendered = export::render(
        format,
        &ExportData {
            project: &project,
            sections: &sections,
            comments: &comments,
            revisions: &revisions,
        },
    )?;

    tracing::info!(
        project_id = id,
        format = format_name,
        bytes = rendered.bytes.len(),
        "Exported project"
    );

    let headers = [
        (CONTENT_TYPE, rendered.content_type.to_string()),
        (
            CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", rendered.filename),
        ),
        (CONTENT_LENGTH, rendered.bytes.len().to_string()),
    ];
    Ok((headers, rendered.bytes).into_response())
}
