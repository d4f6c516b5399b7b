//! Route definitions for admin account management.
//!
//! ```text
//! GET    /users      list accounts (admin only)
//! POST   /users      create account (admin only)
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Admin routes, nested under `/admin`.
pub fn router() -> Router<AppState> {
    Router::new().route("/users", get(admin::list_users).post(admin::create_user))
}
