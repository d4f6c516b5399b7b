pub mod admin;
pub mod auth;
pub mod comment;
pub mod feedback;
pub mod files;
pub mod meeting;
pub mod project;
pub mod workflow;

use sqlx::PgPool;
use uuid::Uuid;
use waypost_core::error::CoreError;
use waypost_core::project::Project;
use waypost_db::models::project::ProjectRecord;
use waypost_db::repositories::ProjectRepo;

use crate::error::{AppError, AppResult};

/// 404 for a missing project document.
pub(crate) fn project_not_found(id: Uuid) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Project",
        id: id.to_string(),
    })
}

/// Load a project document or fail with 404.
pub(crate) async fn load_project(pool: &PgPool, id: Uuid) -> AppResult<ProjectRecord> {
    ProjectRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| project_not_found(id))
}

/// Run one engine operation as a read-modify-write against a project
/// document.
///
/// The write is predicated on the version read. If another request
/// committed in between, the operation fails with `StaleProject` and
/// nothing is applied; a failed engine operation never reaches the
/// database at all.
pub(crate) async fn mutate_project<F>(pool: &PgPool, id: Uuid, op: F) -> AppResult<ProjectRecord>
where
    F: FnOnce(&mut Project) -> Result<(), CoreError>,
{
    let record = load_project(pool, id).await?;
    let mut doc = record.doc.0;
    op(&mut doc)?;

    match ProjectRepo::update_doc(pool, id, record.version, &doc).await? {
        Some(updated) => Ok(updated),
        None => {
            // No row matched: deleted since the read, or the version moved.
            if ProjectRepo::find_by_id(pool, id).await?.is_some() {
                Err(AppError::Core(CoreError::StaleProject))
            } else {
                Err(project_not_found(id))
            }
        }
    }
}
