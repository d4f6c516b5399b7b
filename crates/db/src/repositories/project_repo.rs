//! Repository for the `projects` document table.

use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;
use waypost_core::project::Project;

use crate::models::project::ProjectRecord;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, doc, version, created_at, updated_at";

/// Document-store access for project aggregates.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a freshly created aggregate, returning the stored row.
    pub async fn insert(pool: &PgPool, project: &Project) -> Result<ProjectRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (id, doc) VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectRecord>(&query)
            .bind(project.id)
            .bind(Json(project))
            .fetch_one(pool)
            .await
    }

    /// Find a project document by id.
    pub async fn find_by_id(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Option<ProjectRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, ProjectRecord>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all projects, most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<ProjectRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY created_at DESC");
        sqlx::query_as::<_, ProjectRecord>(&query)
            .fetch_all(pool)
            .await
    }

    /// List the projects belonging to one client, matched on the
    /// document's `client_email` field.
    pub async fn list_for_client(
        pool: &PgPool,
        client_email: &str,
    ) -> Result<Vec<ProjectRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE doc->>'client_email' = $1
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, ProjectRecord>(&query)
            .bind(client_email)
            .fetch_all(pool)
            .await
    }

    /// Version-guarded write of the whole document.
    ///
    /// The update only applies when the stored `version` still equals
    /// `expected_version`; the counter then increments. Returns `None`
    /// when no row matched: the row is missing or was modified since the
    /// caller's read. The caller distinguishes the two by re-checking
    /// existence.
    pub async fn update_doc(
        pool: &PgPool,
        id: Uuid,
        expected_version: i64,
        project: &Project,
    ) -> Result<Option<ProjectRecord>, sqlx::Error> {
        let query = format!(
            "UPDATE projects
             SET doc = $3, version = version + 1, updated_at = NOW()
             WHERE id = $1 AND version = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectRecord>(&query)
            .bind(id)
            .bind(expected_version)
            .bind(Json(project))
            .fetch_optional(pool)
            .await
    }

    /// Delete a project document. Embedded stages, proposals, comments,
    /// and file references go with it. Returns `true` if a row was
    /// removed.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
