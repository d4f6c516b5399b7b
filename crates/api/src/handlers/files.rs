//! Handlers for stage file attachments.
//!
//! Upload is two-step by construction: the blob store persists the bytes
//! and returns the opaque file id, and only then is the reference
//! attached to the stage. A storage failure therefore never leaves a
//! dangling reference in the document.

use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use uuid::Uuid;
use waypost_core::engine;
use waypost_core::error::CoreError;
use waypost_core::project::FileRef;
use waypost_core::types::StageId;
use waypost_db::models::project::ProjectRecord;

use crate::error::{AppError, AppResult};
use crate::handlers::{load_project, mutate_project};
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/projects/{id}/stages/{stage_id}/files
///
/// Accepts a multipart form with a required `file` field. The file name
/// and content type are taken from the multipart part headers.
pub async fn upload(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path((id, stage_id)): Path<(Uuid, StageId)>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<ProjectRecord>>)> {
    let mut file: Option<(String, String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name == "file" {
            let file_name = field.file_name().unwrap_or("upload.bin").to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            file = Some((file_name, content_type, data.to_vec()));
        }
        // ignore unknown fields
    }

    let (file_name, content_type, data) =
        file.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;
    if data.is_empty() {
        return Err(AppError::BadRequest("Uploaded file is empty".into()));
    }

    // Store the bytes first; the reference is attached only after the
    // store confirms.
    let file_id = state.blob_store.put(&data).await?;

    let file_ref = FileRef {
        file_id: file_id.clone(),
        file_name: file_name.clone(),
        content_type,
        uploaded_at: Utc::now(),
    };
    let record = mutate_project(&state.pool, id, |project| {
        engine::attach_file(project, stage_id, file_ref)
    })
    .await?;

    tracing::info!(
        project_id = %id,
        stage_id,
        file_id = %file_id,
        file_name = %file_name,
        size_bytes = data.len(),
        user_id = user.user_id,
        "File attached",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: record })))
}

/// GET /api/v1/projects/{id}/stages/{stage_id}/files/{file_id}
///
/// Stream an attached file back. The reference on the stage is
/// authoritative; an id that is not attached there is a 404 even if the
/// blob exists.
pub async fn download(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    Path((id, stage_id, file_id)): Path<(Uuid, StageId, String)>,
) -> AppResult<Response> {
    let record = load_project(&state.pool, id).await?;
    let stage = record
        .doc
        .0
        .stage(stage_id)
        .ok_or(AppError::Core(CoreError::StageNotFound { stage_id }))?;
    let file_ref = stage
        .files
        .iter()
        .find(|f| f.file_id == file_id)
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "File",
                id: file_id.clone(),
            })
        })?;

    let bytes = state.blob_store.get(&file_ref.file_id).await?.ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "File",
            id: file_ref.file_id.clone(),
        })
    })?;

    let headers = [
        (header::CONTENT_TYPE, file_ref.content_type.clone()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file_ref.file_name),
        ),
    ];
    Ok((headers, bytes).into_response())
}
