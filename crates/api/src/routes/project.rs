//! Route definitions for the project workflow.
//!
//! ```text
//! GET    /                                        list (role-scoped)
//! POST   /                                        create
//! GET    /{id}                                    get (admin or owner)
//! PATCH  /{id}                                    late flag (admin)
//! DELETE /{id}                                    delete (admin)
//!
//! POST   /{id}/advance                            complete current stage
//! POST   /{id}/revert                             re-open previous stage
//! PUT    /{id}/stages/{stage_id}/field            set link / form answers
//!
//! POST   /{id}/comments                           append comment
//!
//! POST   /{id}/proposals                          propose meeting
//! PATCH  /{id}/proposals/{proposal_id}            accept / reject
//! DELETE /{id}/proposals/{proposal_id}            delete proposal
//!
//! POST   /{id}/stages/{stage_id}/feedback         append feedback
//! POST   /{id}/stages/{stage_id}/files            upload + attach file
//! GET    /{id}/stages/{stage_id}/files/{file_id}  download attachment
//! ```

use axum::routing::{get, patch, post, put};
use axum::Router;

use crate::handlers::{comment, feedback, files, meeting, project, workflow};
use crate::state::AppState;

/// Project routes, nested under `/projects`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route(
            "/{id}",
            get(project::get_by_id)
                .patch(project::set_late_flag)
                .delete(project::delete),
        )
        .route("/{id}/advance", post(workflow::advance))
        .route("/{id}/revert", post(workflow::revert))
        .route(
            "/{id}/stages/{stage_id}/field",
            put(workflow::set_stage_field),
        )
        .route("/{id}/comments", post(comment::append))
        .route("/{id}/proposals", post(meeting::create))
        .route(
            "/{id}/proposals/{proposal_id}",
            patch(meeting::update).delete(meeting::delete),
        )
        .route("/{id}/stages/{stage_id}/feedback", post(feedback::append))
        .route("/{id}/stages/{stage_id}/files", post(files::upload))
        .route(
            "/{id}/stages/{stage_id}/files/{file_id}",
            get(files::download),
        )
}
