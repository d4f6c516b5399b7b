//! Handlers for admin account management. Plain CRUD, no workflow
//! invariants.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use waypost_core::error::CoreError;
use waypost_core::roles::validate_role;
use waypost_db::models::user::{CreateUser, User};
use waypost_db::repositories::UserRepo;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/admin/users
///
/// Create a portal account. Admin only; the plaintext password is hashed
/// here and never stored.
pub async fn create_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateUser>,
) -> AppResult<(StatusCode, Json<DataResponse<User>>)> {
    validate_role(&input.role).map_err(AppError::Core)?;
    validate_password_strength(&input.password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    if input.email.trim().is_empty() || !input.email.contains('@') {
        return Err(AppError::Core(CoreError::Validation(
            "A valid email address is required".to_string(),
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        input.email.trim(),
        &password_hash,
        &input.display_name,
        &input.role,
    )
    .await?;

    tracing::info!(
        user_id = user.id,
        role = %user.role,
        created_by = admin.user_id,
        "Account created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: user })))
}

/// GET /api/v1/admin/users
///
/// List all portal accounts. Admin only.
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<User>>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: users }))
}
