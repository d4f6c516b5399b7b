use std::sync::Arc;

use crate::config::ServerConfig;
use crate::storage::BlobStore;

/// Shared application state available to all axum handlers via
/// `State<AppState>`.
///
/// Cheaply cloneable: inner data is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: waypost_db::DbPool,
    /// Server configuration (JWT secret, CORS origins, blob store root).
    pub config: Arc<ServerConfig>,
    /// File storage collaborator; bytes never touch the database.
    pub blob_store: Arc<dyn BlobStore>,
}
