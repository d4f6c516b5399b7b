//! Integration tests for the users repository.

use sqlx::PgPool;
use waypost_db::repositories::UserRepo;

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_and_find_by_email(pool: PgPool) {
    let created = UserRepo::create(&pool, "ana@agency.test", "$argon2id$fake", "Ana", "admin")
        .await
        .unwrap();

    let found = UserRepo::find_by_email(&pool, "ana@agency.test")
        .await
        .unwrap()
        .expect("user should exist");

    assert_eq!(found.id, created.id);
    assert_eq!(found.role, "admin");
    assert_eq!(found.display_name, "Ana");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_email_violates_unique_constraint(pool: PgPool) {
    UserRepo::create(&pool, "ana@agency.test", "$argon2id$fake", "Ana", "admin")
        .await
        .unwrap();

    let err = UserRepo::create(&pool, "ana@agency.test", "$argon2id$fake", "Imposter", "client")
        .await
        .unwrap_err();

    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.constraint(), Some("uq_users_email"));
        }
        other => panic!("expected a database error, got {other:?}"),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn count_tracks_inserts(pool: PgPool) {
    assert_eq!(UserRepo::count(&pool).await.unwrap(), 0);

    UserRepo::create(&pool, "ana@agency.test", "$argon2id$fake", "Ana", "admin")
        .await
        .unwrap();
    UserRepo::create(&pool, "pm@acme.test", "$argon2id$fake", "Pat", "client")
        .await
        .unwrap();

    assert_eq!(UserRepo::count(&pool).await.unwrap(), 2);
}
