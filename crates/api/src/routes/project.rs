//! Route definitions for the `/projects` resource.
//!
//! Also nests section, revision, comment, and feedback routes under
//! `/projects/{project_id}/sections/...`.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::{comment, export, feedback, project, revision, section};
use crate::state::AppState;

/// Routes mounted at `/projects`.
pub fn router() -> Router<AppState> {
    let section_routes = Router::new()
        .route("/", get(section::list).post(section::create))
        .route(
            "/{id}",
            get(section::get_by_id)
                .put(section::update)
                .delete(section::delete),
        )
        .route("/{id}/generate", post(section::generate))
        .route("/{id}/refine", post(section::refine))
        .route("/{id}/revisions", get(revision::list))
        .route("/{id}/comments", get(comment::list).post(comment::create))
        .route("/{id}/comments/{comment_id}", delete(comment::delete))
        .route("/{id}/feedback", get(feedback::get).put(feedback::put));

    Router::new()
        .route("/", get(project::list).post(project::create))
        .route(
            "/{id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        .route("/{id}/generate", post(project::generate))
        .route("/{id}/export", get(export::export))
        .nest("/{project_id}/sections", section_routes)
}
