//! Shared helpers for HTTP-level integration tests.
//!
//! Builds the real application router (same middleware stack as
//! production) on top of the per-test database pool provided by
//! `#[sqlx::test]`, plus request/response plumbing and account seeding.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use waypost_api::auth::jwt::JwtConfig;
use waypost_api::auth::password::hash_password;
use waypost_api::config::ServerConfig;
use waypost_api::router::build_app_router;
use waypost_api::state::AppState;
use waypost_api::storage::LocalBlobStore;
use waypost_db::repositories::UserRepo;

/// Build a test `ServerConfig` with safe defaults and a throwaway blob
/// store directory.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        blob_store_path: std::env::temp_dir()
            .join(format!("waypost-test-blobs-{}", uuid::Uuid::new_v4())),
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Build the full application router with all middleware layers, using
/// the given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let blob_store = Arc::new(LocalBlobStore::new(config.blob_store_path.clone()));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        blob_store,
    };

    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    path: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, path: &str) -> Response {
    send(app, Method::GET, path, None, None).await
}

pub async fn get_auth(app: Router, path: &str, token: &str) -> Response {
    send(app, Method::GET, path, Some(token), None).await
}

pub async fn post_json(app: Router, path: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, path, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    path: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, Method::POST, path, Some(token), Some(body)).await
}

pub async fn post_auth(app: Router, path: &str, token: &str) -> Response {
    send(app, Method::POST, path, Some(token), None).await
}

pub async fn put_json_auth(
    app: Router,
    path: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, Method::PUT, path, Some(token), Some(body)).await
}

pub async fn patch_json_auth(
    app: Router,
    path: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, Method::PATCH, path, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, path: &str, token: &str) -> Response {
    send(app, Method::DELETE, path, Some(token), None).await
}

/// Collect a response body into parsed JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Account seeding
// ---------------------------------------------------------------------------

/// Password used by every seeded test account.
pub const TEST_PASSWORD: &str = "test_password_123!";

/// Create an account directly in the database.
pub async fn seed_user(pool: &PgPool, email: &str, role: &str) {
    let hashed = hash_password(TEST_PASSWORD).expect("hashing should succeed");
    UserRepo::create(pool, email, &hashed, "Test User", role)
        .await
        .expect("user creation should succeed");
}

/// Log in through the API and return the access token.
pub async fn login(app: Router, email: &str) -> String {
    let body = serde_json::json!({ "email": email, "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    json["access_token"].as_str().unwrap().to_string()
}

/// Seed an admin account and log it in.
pub async fn admin_token(pool: &PgPool, app: Router) -> String {
    seed_user(pool, "admin@agency.test", "admin").await;
    login(app, "admin@agency.test").await
}

/// Seed a client account and log it in.
pub async fn client_token(pool: &PgPool, app: Router, email: &str) -> String {
    seed_user(pool, email, "client").await;
    login(app, email).await
}
