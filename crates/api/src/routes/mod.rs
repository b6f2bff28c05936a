pub mod auth;
pub mod health;
pub mod project;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                                   register (public)
/// /auth/login                                      login (public)
/// /auth/refresh                                    refresh (public)
/// /auth/logout                                     logout (requires auth)
/// /auth/me                                         current user
///
/// /projects                                        list, create
/// /projects/{id}                                   get, update, delete
/// /projects/{id}/generate                          initial content generation
/// /projects/{id}/export                            document export
/// /projects/{project_id}/sections                  list, create
/// /projects/{project_id}/sections/{id}             get, update, delete
/// /projects/{project_id}/sections/{id}/generate    section generation
/// /projects/{project_id}/sections/{id}/refine      section refinement
/// /projects/{project_id}/sections/{id}/revisions   revision history
/// /projects/{project_id}/sections/{id}/comments    list, create
/// /projects/{project_id}/sections/{id}/comments/{comment_id}  delete
/// /projects/{project_id}/sections/{id}/feedback    get, upsert
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/projects", project::router())
}
