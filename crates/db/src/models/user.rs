//! User account row and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use waypost_core::types::{DbId, Timestamp};

/// A row from the `users` table.
///
/// The password hash never leaves the server: it is skipped on
/// serialization.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub display_name: String,
    pub role: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an account. The plaintext password is hashed by the
/// API layer before it reaches the repository.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub password: String,
    pub display_name: String,
    pub role: String,
}
