//! Content-addressable blob storage.
//!
//! Uploaded files never touch the database: the store persists the bytes
//! and hands back an opaque file id (the SHA-256 hex digest of the
//! content), which the engine then attaches to a stage as a reference.
//! The provider is a trait so deployments can swap the local-filesystem
//! implementation for an object store without touching handlers.

use std::path::PathBuf;

use async_trait::async_trait;
use sha2::{Digest, Sha256};

/// Errors from the storage collaborator.
#[derive(Debug, thiserror::Error)]
pub enum BlobStoreError {
    #[error("blob store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A content-addressable store for uploaded file bytes.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Persist a blob, returning its opaque file id. Storing the same
    /// bytes twice returns the same id.
    async fn put(&self, bytes: &[u8]) -> Result<String, BlobStoreError>;

    /// Fetch a blob by id. `None` if the id is unknown.
    async fn get(&self, file_id: &str) -> Result<Option<Vec<u8>>, BlobStoreError>;
}

/// Local-filesystem provider: one file per blob under a root directory,
/// named by content digest.
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// File ids are SHA-256 hex digests; reject anything else before it
    /// is joined onto the root path.
    fn is_valid_id(file_id: &str) -> bool {
        file_id.len() == 64 && file_id.chars().all(|c| c.is_ascii_hexdigit())
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(&self, bytes: &[u8]) -> Result<String, BlobStoreError> {
        let digest = Sha256::digest(bytes);
        let file_id = format!("{digest:x}");

        tokio::fs::create_dir_all(&self.root).await?;
        let path = self.root.join(&file_id);
        // Content-addressed: an existing file already holds these bytes.
        if tokio::fs::try_exists(&path).await? {
            return Ok(file_id);
        }
        tokio::fs::write(&path, bytes).await?;
        Ok(file_id)
    }

    async fn get(&self, file_id: &str) -> Result<Option<Vec<u8>>, BlobStoreError> {
        if !Self::is_valid_id(file_id) {
            return Ok(None);
        }
        match tokio::fs::read(self.root.join(file_id)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
