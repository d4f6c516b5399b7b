//! Handlers for stage transitions and stage field updates.

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;
use waypost_core::engine::{self, StageField};
use waypost_core::types::StageId;
use waypost_db::models::project::ProjectRecord;

use crate::error::AppResult;
use crate::handlers::mutate_project;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/projects/{id}/advance
///
/// Complete the current stage and open the next one. One forward step per
/// call; double-submitting advances twice.
pub async fn advance(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DataResponse<ProjectRecord>>> {
    let record = mutate_project(&state.pool, id, |project| {
        engine::complete_current_stage(project, Utc::now())
    })
    .await?;

    tracing::info!(
        project_id = %id,
        current_stage = record.doc.0.current_stage,
        user_id = admin.user_id,
        "Stage completed",
    );
    Ok(Json(DataResponse { data: record }))
}

/// POST /api/v1/projects/{id}/revert
///
/// Re-open the previous stage. Status-only: stage payload survives.
pub async fn revert(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DataResponse<ProjectRecord>>> {
    let record = mutate_project(&state.pool, id, engine::revert_to_previous_stage).await?;

    tracing::info!(
        project_id = %id,
        current_stage = record.doc.0.current_stage,
        user_id = admin.user_id,
        "Stage reverted",
    );
    Ok(Json(DataResponse { data: record }))
}

/// Request body for `PUT /projects/{id}/stages/{stage_id}/field`.
#[derive(Debug, Deserialize)]
pub struct SetStageFieldRequest {
    pub field: StageField,
    pub value: serde_json::Value,
}

/// PUT /api/v1/projects/{id}/stages/{stage_id}/field
///
/// Write a configuration field (link, form answers) on any stage,
/// including locked ones; these are admin-prefilled values, not progress
/// signals.
pub async fn set_stage_field(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path((id, stage_id)): Path<(Uuid, StageId)>,
    Json(input): Json<SetStageFieldRequest>,
) -> AppResult<Json<DataResponse<ProjectRecord>>> {
    let record = mutate_project(&state.pool, id, |project| {
        engine::set_stage_field(project, stage_id, input.field, input.value)
    })
    .await?;
    Ok(Json(DataResponse { data: record }))
}
