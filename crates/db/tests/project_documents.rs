//! Integration tests for the project document store.
//!
//! Exercises the repository layer against a real database to verify that:
//! - A freshly seeded aggregate round-trips through JSONB intact
//! - The version-guarded update rejects stale writes
//! - Client-scoped listing matches on the embedded `client_email`
//! - Deleting a document removes the whole aggregate

use chrono::Utc;
use sqlx::PgPool;
use waypost_core::catalog::STAGE_COUNT;
use waypost_core::engine;
use waypost_core::project::{Project, StageStatus};
use waypost_db::repositories::ProjectRepo;

fn new_project(name: &str, client_email: &str) -> Project {
    Project::create(name, "Acme Bakery", client_email, Utc::now())
}

// ---------------------------------------------------------------------------
// Round trip
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn insert_and_find_round_trips_the_document(pool: PgPool) {
    let project = new_project("Site relaunch", "pm@acme.test");

    let stored = ProjectRepo::insert(&pool, &project).await.unwrap();
    assert_eq!(stored.version, 1);

    let found = ProjectRepo::find_by_id(&pool, project.id)
        .await
        .unwrap()
        .expect("document should exist");

    let doc = &found.doc.0;
    assert_eq!(doc.id, project.id);
    assert_eq!(doc.current_stage, 1);
    assert_eq!(doc.stages.len() as u32, STAGE_COUNT);
    assert_eq!(doc.stages[0].status, StageStatus::InProgress);
    assert!(doc.invariant_holds());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn find_missing_document_returns_none(pool: PgPool) {
    let ghost = uuid::Uuid::new_v4();
    assert!(ProjectRepo::find_by_id(&pool, ghost).await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Version guard
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn version_guard_accepts_the_first_writer_only(pool: PgPool) {
    let mut project = new_project("Site relaunch", "pm@acme.test");
    let stored = ProjectRepo::insert(&pool, &project).await.unwrap();

    // First writer: read version 1, write, version becomes 2.
    engine::complete_current_stage(&mut project, Utc::now()).unwrap();
    let updated = ProjectRepo::update_doc(&pool, project.id, stored.version, &project)
        .await
        .unwrap()
        .expect("first write should apply");
    assert_eq!(updated.version, 2);

    // Second writer raced on the same stale read: rejected, nothing
    // applied.
    let stale = ProjectRepo::update_doc(&pool, project.id, stored.version, &project)
        .await
        .unwrap();
    assert!(stale.is_none());

    let current = ProjectRepo::find_by_id(&pool, project.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(current.version, 2);
    assert_eq!(current.doc.0.current_stage, 2);
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn client_listing_matches_on_embedded_email(pool: PgPool) {
    let mine = new_project("Site relaunch", "pm@acme.test");
    let other = new_project("Brochure site", "owner@florist.test");
    ProjectRepo::insert(&pool, &mine).await.unwrap();
    ProjectRepo::insert(&pool, &other).await.unwrap();

    let listed = ProjectRepo::list_for_client(&pool, "pm@acme.test")
        .await
        .unwrap();

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, mine.id);

    let all = ProjectRepo::list(&pool).await.unwrap();
    assert_eq!(all.len(), 2);
}

// ---------------------------------------------------------------------------
// Deletion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_removes_the_document(pool: PgPool) {
    let project = new_project("Site relaunch", "pm@acme.test");
    ProjectRepo::insert(&pool, &project).await.unwrap();

    assert!(ProjectRepo::delete(&pool, project.id).await.unwrap());
    assert!(ProjectRepo::find_by_id(&pool, project.id)
        .await
        .unwrap()
        .is_none());

    // Second delete is a no-op.
    assert!(!ProjectRepo::delete(&pool, project.id).await.unwrap());
}
