//! Project document row and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;
use waypost_core::project::Project;
use waypost_core::types::Timestamp;

/// A row from the `projects` table: the whole aggregate as one JSONB
/// document plus the optimistic-concurrency version counter.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectRecord {
    pub id: Uuid,
    pub doc: Json<Project>,
    pub version: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub name: String,
    pub client: String,
    pub client_email: String,
}
