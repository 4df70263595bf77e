//! Email authentication backend tests.
//!
//! Requires `DATABASE_URL` pointing at a `PostgreSQL` server.
//! Run with: cargo test -p meroghar-integration-tests -- --ignored

#![allow(clippy::unwrap_used)]

use meroghar_admin::{
    db::{RepositoryError, UserRepository},
    models::NewUser,
    services::{AuthError, EmailAuthBackend},
};
use meroghar_core::Email;
use meroghar_integration_tests::{PASSWORD, create_user};
use sqlx::PgPool;

#[sqlx::test(migrations = "../admin/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_authenticate_correct_password(pool: PgPool) {
    let user = create_user(&pool, "jane", "jane@example.com", false).await;

    let authenticated = EmailAuthBackend::new(&pool)
        .authenticate("jane@example.com", PASSWORD)
        .await
        .unwrap();
    assert_eq!(authenticated.map(|u| u.id), Some(user.id));
}

#[sqlx::test(migrations = "../admin/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_authenticate_normalizes_email(pool: PgPool) {
    let user = create_user(&pool, "jane", "jane@example.com", false).await;

    let authenticated = EmailAuthBackend::new(&pool)
        .authenticate("  jane@EXAMPLE.com ", PASSWORD)
        .await
        .unwrap();
    assert_eq!(authenticated.map(|u| u.id), Some(user.id));
}

#[sqlx::test(migrations = "../admin/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_authenticate_wrong_password(pool: PgPool) {
    create_user(&pool, "jane", "jane@example.com", false).await;

    let authenticated = EmailAuthBackend::new(&pool)
        .authenticate("jane@example.com", "not the password")
        .await
        .unwrap();
    assert!(authenticated.is_none());
}

#[sqlx::test(migrations = "../admin/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_authenticate_unknown_or_malformed_email(pool: PgPool) {
    let backend = EmailAuthBackend::new(&pool);
    assert!(backend.authenticate("nobody@example.com", PASSWORD).await.unwrap().is_none());
    assert!(backend.authenticate("not-an-email", PASSWORD).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../admin/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_duplicate_email_conflicts(pool: PgPool) {
    create_user(&pool, "jane", "jane@example.com", false).await;

    let again = NewUser::new(
        "jane2",
        Email::parse("jane@Example.com").unwrap(),
        None,
        None,
        false,
    )
    .unwrap();
    let result = EmailAuthBackend::new(&pool).create_user(&again, PASSWORD).await;
    assert!(matches!(
        result,
        Err(AuthError::Repository(RepositoryError::Conflict(_)))
    ));
}

#[sqlx::test(migrations = "../admin/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_weak_password_is_rejected(pool: PgPool) {
    let new_user = NewUser::new(
        "jane",
        Email::parse("jane@example.com").unwrap(),
        None,
        None,
        false,
    )
    .unwrap();
    let result = EmailAuthBackend::new(&pool).create_user(&new_user, "short").await;
    assert!(matches!(result, Err(AuthError::WeakPassword(_))));

    let stored = UserRepository::new(&pool)
        .get_by_email(&new_user.email)
        .await
        .unwrap();
    assert!(stored.is_none());
}

#[sqlx::test(migrations = "../admin/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_set_password_replaces_old_one(pool: PgPool) {
    let user = create_user(&pool, "jane", "jane@example.com", false).await;
    let backend = EmailAuthBackend::new(&pool);

    backend.set_password(user.id, "a brand new secret").await.unwrap();

    assert!(backend.authenticate("jane@example.com", PASSWORD).await.unwrap().is_none());
    assert!(
        backend
            .authenticate("jane@example.com", "a brand new secret")
            .await
            .unwrap()
            .is_some()
    );
}

#[sqlx::test(migrations = "../admin/migrations")]
#[ignore = "Requires PostgreSQL (DATABASE_URL)"]
async fn test_resolve_by_id(pool: PgPool) {
    let user = create_user(&pool, "jane", "jane@example.com", true).await;
    let backend = EmailAuthBackend::new(&pool);

    let resolved = backend.resolve_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(resolved.email, user.email);
    assert!(resolved.is_staff);

    let missing = backend
        .resolve_by_id(meroghar_core::UserId::new(user.id.as_i32() + 1))
        .await
        .unwrap();
    assert!(missing.is_none());
}
