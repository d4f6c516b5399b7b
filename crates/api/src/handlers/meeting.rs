//! Handlers for the meeting-proposal sub-protocol on the discovery stage.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;
use waypost_core::meeting;
use waypost_core::types::Timestamp;
use waypost_db::models::project::ProjectRecord;

use crate::error::AppResult;
use crate::handlers::mutate_project;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /projects/{id}/proposals`.
#[derive(Debug, Deserialize)]
pub struct ProposeMeetingRequest {
    pub date_time: Timestamp,
}

/// The two resolutions a caller can apply to an open proposal.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalDecision {
    Accepted,
    Rejected,
}

/// Request body for `PATCH /projects/{id}/proposals/{proposal_id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateProposalRequest {
    pub status: ProposalDecision,
}

/// POST /api/v1/projects/{id}/proposals
///
/// Add a candidate kickoff time. Several proposals may be open at once.
pub async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<ProposeMeetingRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<ProjectRecord>>)> {
    let record = mutate_project(&state.pool, id, |project| {
        meeting::propose_meeting(project, input.date_time).map(|_| ())
    })
    .await?;

    tracing::info!(
        project_id = %id,
        date_time = %input.date_time,
        user_id = user.user_id,
        "Meeting proposed",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: record })))
}

/// PATCH /api/v1/projects/{id}/proposals/{proposal_id}
///
/// Accept or reject a proposal. Accepting stamps the discovery stage's
/// date with the proposed time but never advances the pipeline.
pub async fn update(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path((id, proposal_id)): Path<(Uuid, Uuid)>,
    Json(input): Json<UpdateProposalRequest>,
) -> AppResult<Json<DataResponse<ProjectRecord>>> {
    let record = mutate_project(&state.pool, id, |project| match input.status {
        ProposalDecision::Accepted => meeting::accept_proposal(project, proposal_id),
        ProposalDecision::Rejected => meeting::reject_proposal(project, proposal_id),
    })
    .await?;

    tracing::info!(
        project_id = %id,
        proposal_id = %proposal_id,
        decision = ?input.status,
        user_id = user.user_id,
        "Meeting proposal resolved",
    );
    Ok(Json(DataResponse { data: record }))
}

/// DELETE /api/v1/projects/{id}/proposals/{proposal_id}
///
/// Remove a proposal in any state.
pub async fn delete(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path((id, proposal_id)): Path<(Uuid, Uuid)>,
) -> AppResult<StatusCode> {
    mutate_project(&state.pool, id, |project| {
        meeting::delete_proposal(project, proposal_id)
    })
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
