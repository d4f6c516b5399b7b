//! Handlers for project comments.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;
use waypost_core::engine;
use waypost_db::models::project::ProjectRecord;

use crate::error::AppResult;
use crate::handlers::mutate_project;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /projects/{id}/comments`.
#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub author: String,
    pub text: String,
    /// Stage the comment was written against, if any.
    pub stage_id: Option<waypost_core::types::StageId>,
}

/// POST /api/v1/projects/{id}/comments
///
/// Append a comment. Comments are append-only; there is no edit or
/// delete.
pub async fn append(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<CommentRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<ProjectRecord>>)> {
    let record = mutate_project(&state.pool, id, |project| {
        engine::append_comment(project, input.stage_id, &input.author, &input.text, Utc::now())
    })
    .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: record })))
}
