//! Handlers for client feedback on feedback-capable stages.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;
use waypost_core::feedback;
use waypost_core::types::StageId;
use waypost_db::models::project::ProjectRecord;

use crate::error::AppResult;
use crate::handlers::mutate_project;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /projects/{id}/stages/{stage_id}/feedback`.
#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub author: String,
    pub text: String,
}

/// POST /api/v1/projects/{id}/stages/{stage_id}/feedback
///
/// Append one feedback entry, counting a revision round first. On a
/// round-limited stage an exhausted limit surfaces as 409 with a stable
/// message; nothing is recorded.
pub async fn append(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path((id, stage_id)): Path<(Uuid, StageId)>,
    Json(input): Json<FeedbackRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<ProjectRecord>>)> {
    let record = mutate_project(&state.pool, id, |project| {
        feedback::append_feedback(project, stage_id, &input.author, &input.text, Utc::now())
    })
    .await?;

    tracing::info!(
        project_id = %id,
        stage_id,
        user_id = user.user_id,
        "Feedback recorded",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: record })))
}
