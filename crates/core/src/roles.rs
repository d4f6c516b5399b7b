//! Well-known role name constants.
//!
//! These must match the CHECK constraint in the users table migration.

use crate::error::CoreError;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_CLIENT: &str = "client";

/// All valid role names.
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_CLIENT];

/// Validate that a role string is one of the accepted values.
pub fn validate_role(role: &str) -> Result<(), CoreError> {
    if VALID_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid role '{role}'. Must be one of: {}",
            VALID_ROLES.join(", ")
        )))
    }
}
