//! Handlers for the `/projects` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;
use waypost_core::error::CoreError;
use waypost_core::project::Project;
use waypost_core::roles::ROLE_ADMIN;
use waypost_db::models::project::{CreateProject, ProjectRecord};
use waypost_db::repositories::{ProjectRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::{load_project, mutate_project};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

/// Resolve the caller's account email, used to scope client access to
/// their own projects.
async fn caller_email(state: &AppState, user: &AuthUser) -> AppResult<String> {
    let account = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Account no longer exists".to_string(),
            ))
        })?;
    Ok(account.email)
}

/// POST /api/v1/projects
///
/// Create a project seeded from the stage catalog: stage 1 in progress,
/// everything else locked.
pub async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<DataResponse<ProjectRecord>>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Project name must not be empty".to_string(),
        )));
    }
    if !input.client_email.contains('@') {
        return Err(AppError::Core(CoreError::Validation(
            "A valid client email address is required".to_string(),
        )));
    }

    let project = Project::create(&input.name, &input.client, &input.client_email, Utc::now());
    let record = ProjectRepo::insert(&state.pool, &project).await?;

    tracing::info!(
        project_id = %project.id,
        name = %project.name,
        user_id = user.user_id,
        "Project created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: record })))
}

/// GET /api/v1/projects
///
/// Admins see every project; clients see only their own, matched on the
/// document's client email.
pub async fn list(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ProjectRecord>>>> {
    let records = if user.role == ROLE_ADMIN {
        ProjectRepo::list(&state.pool).await?
    } else {
        let email = caller_email(&state, &user).await?;
        ProjectRepo::list_for_client(&state.pool, &email).await?
    };
    Ok(Json(DataResponse { data: records }))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DataResponse<ProjectRecord>>> {
    let record = load_project(&state.pool, id).await?;

    if user.role != ROLE_ADMIN {
        let email = caller_email(&state, &user).await?;
        if record.doc.0.client_email != email {
            return Err(AppError::Core(CoreError::Forbidden(
                "This project belongs to another client".to_string(),
            )));
        }
    }

    Ok(Json(DataResponse { data: record }))
}

/// Request body for `PATCH /projects/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateProjectRequest {
    pub is_late: bool,
}

/// PATCH /api/v1/projects/{id}
///
/// Toggle the late-alert flag. Admin only; the flag carries no workflow
/// meaning.
pub async fn set_late_flag(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateProjectRequest>,
) -> AppResult<Json<DataResponse<ProjectRecord>>> {
    let record = mutate_project(&state.pool, id, |project| {
        project.is_late = input.is_late;
        Ok(())
    })
    .await?;
    Ok(Json(DataResponse { data: record }))
}

/// DELETE /api/v1/projects/{id}
///
/// Remove the whole document; embedded stages, comments, proposals, and
/// file references go with it. Admin only.
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let deleted = ProjectRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(crate::handlers::project_not_found(id));
    }

    tracing::info!(project_id = %id, user_id = admin.user_id, "Project deleted");
    Ok(StatusCode::NO_CONTENT)
}
