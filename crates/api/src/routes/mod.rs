pub mod admin;
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
/// /auth/login                                     login (public)
///
/// /admin/users                                    list, create (admin only)
///
/// /projects                                       list, create
/// /projects/{id}                                  get, late flag, delete
/// /projects/{id}/advance                          complete current stage
/// /projects/{id}/revert                           re-open previous stage
/// /projects/{id}/stages/{stage_id}/field          set link / form answers
/// /projects/{id}/comments                         append comment
/// /projects/{id}/proposals                        propose meeting
/// /projects/{id}/proposals/{proposal_id}          accept / reject / delete
/// /projects/{id}/stages/{stage_id}/feedback       append feedback
/// /projects/{id}/stages/{stage_id}/files          upload, download
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
        .nest("/projects", project::router())
}
