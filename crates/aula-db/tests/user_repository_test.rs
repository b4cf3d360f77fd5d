//! Integration tests for the User repository using in-memory SurrealDB.

use aula_core::models::tenant::CreateTenant;
use aula_core::models::user::{CreateUser, UpdateUser, UserStatus};
use aula_core::repository::{TenantRepository, UserRepository};
use aula_db::repository::{SurrealTenantRepository, SurrealUserRepository};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

async fn setup() -> (Surreal<surrealdb::engine::local::Db>, Uuid) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    aula_db::run_migrations(&db).await.unwrap();

    let tenant_repo = SurrealTenantRepository::new(db.clone());
    let tenant = tenant_repo
        .create(CreateTenant {
            name: "Test School".into(),
            slug: "test-school".into(),
            subdomain: "test-school".into(),
            country: None,
            timezone: None,
            currency: None,
        })
        .await
        .unwrap();

    (db, tenant.id)
}

fn user_input(tenant_id: Uuid, subject: &str, email: &str) -> CreateUser {
    CreateUser {
        tenant_id,
        subject: subject.into(),
        email: email.into(),
        name: None,
    }
}

#[tokio::test]
async fn create_and_get_by_subject() {
    let (db, tenant_id) = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo
        .create(user_input(tenant_id, "idp|alice", "alice@example.com"))
        .await
        .unwrap();

    assert_eq!(user.status, UserStatus::Active);
    assert!(user.last_signed_in.is_some());

    let fetched = repo.get_by_subject(tenant_id, "idp|alice").await.unwrap();
    assert_eq!(fetched.id, user.id);

    assert!(repo.get_by_subject(tenant_id, "idp|nobody").await.is_err());
}

#[tokio::test]
async fn upsert_creates_then_touches() {
    let (db, tenant_id) = setup().await;
    let repo = SurrealUserRepository::new(db);

    // First login: creates the user.
    let first = repo
        .upsert_by_subject(user_input(tenant_id, "idp|bob", "bob@example.com"))
        .await
        .unwrap();

    // Second login: same identity, no new record.
    let second = repo
        .upsert_by_subject(user_input(tenant_id, "idp|bob", "bob@example.com"))
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert!(second.last_signed_in.is_some());
    assert_eq!(second.email, "bob@example.com");
}

#[tokio::test]
async fn duplicate_subject_rejected() {
    let (db, tenant_id) = setup().await;
    let repo = SurrealUserRepository::new(db);

    repo.create(user_input(tenant_id, "idp|carol", "carol@example.com"))
        .await
        .unwrap();

    let result = repo
        .create(user_input(tenant_id, "idp|carol", "other@example.com"))
        .await;
    assert!(result.is_err(), "duplicate subject should be rejected");
}

#[tokio::test]
async fn update_user_status() {
    let (db, tenant_id) = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo
        .create(user_input(tenant_id, "idp|dave", "dave@example.com"))
        .await
        .unwrap();

    let updated = repo
        .update(
            tenant_id,
            user.id,
            UpdateUser {
                status: Some(UserStatus::Suspended),
                name: Some("Dave".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.status, UserStatus::Suspended);
    assert_eq!(updated.name.as_deref(), Some("Dave"));
    assert_eq!(updated.email, "dave@example.com"); // unchanged
}
