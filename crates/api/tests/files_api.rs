//! HTTP-level integration tests for stage file attachments.

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use common::{body_json, post_json_auth};
use sqlx::PgPool;
use tower::ServiceExt;

const BOUNDARY: &str = "waypost-test-boundary";

async fn create_project(app: Router, token: &str) -> String {
    let body = serde_json::json!({
        "name": "Site relaunch",
        "client": "Acme Bakery",
        "client_email": "pm@acme.test",
    });
    let response = post_json_auth(app, "/api/v1/projects", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Build a single-file multipart request body.
fn multipart_body(file_name: &str, content_type: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; \
             filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

async fn upload(
    app: Router,
    token: &str,
    project_id: &str,
    stage_id: u32,
    file_name: &str,
    bytes: &[u8],
) -> axum::response::Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(format!(
            "/api/v1/projects/{project_id}/stages/{stage_id}/files"
        ))
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(
            file_name,
            "application/pdf",
            bytes,
        )))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn upload_attaches_a_content_addressed_reference(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = common::admin_token(&pool, app.clone()).await;
    let id = create_project(app.clone(), &token).await;

    // Specification (2) accepts files.
    let response = upload(app.clone(), &token, &id, 2, "brief.pdf", b"brief contents").await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let files = json["data"]["doc"]["stages"][1]["files"].as_array().unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["file_name"], "brief.pdf");
    assert_eq!(files[0]["content_type"], "application/pdf");
    // The file id is a SHA-256 hex digest of the content.
    assert_eq!(files[0]["file_id"].as_str().unwrap().len(), 64);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn attached_files_download_with_their_metadata(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = common::admin_token(&pool, app.clone()).await;
    let id = create_project(app.clone(), &token).await;

    let response = upload(app.clone(), &token, &id, 2, "brief.pdf", b"brief contents").await;
    let json = body_json(response).await;
    let file_id = json["data"]["doc"]["stages"][1]["files"][0]["file_id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = common::get_auth(
        app.clone(),
        &format!("/api/v1/projects/{id}/stages/2/files/{file_id}"),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/pdf"
    );
    let bytes = http_body_util::BodyExt::collect(response.into_body())
        .await
        .unwrap()
        .to_bytes();
    assert_eq!(&bytes[..], b"brief contents");

    // A digest that is not attached to the stage is a 404.
    let ghost = "0".repeat(64);
    let response = common::get_auth(
        app.clone(),
        &format!("/api/v1/projects/{id}/stages/2/files/{ghost}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn upload_to_a_stage_without_the_files_tag_fails(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = common::admin_token(&pool, app.clone()).await;
    let id = create_project(app.clone(), &token).await;

    // Signature (4) carries a link but no file payload.
    let response = upload(app.clone(), &token, &id, 4, "contract.pdf", b"contract").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "FIELD_NOT_SUPPORTED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_uploads_are_rejected(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let token = common::admin_token(&pool, app.clone()).await;
    let id = create_project(app.clone(), &token).await;

    let response = upload(app.clone(), &token, &id, 2, "empty.pdf", b"").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
