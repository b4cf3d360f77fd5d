//! Integration tests for Role and Permission repositories using in-memory SurrealDB.

use aula_core::AulaError;
use aula_core::models::campus::CreateCampus;
use aula_core::models::permission::CreatePermission;
use aula_core::models::role::{CreateRole, UpdateRole};
use aula_core::models::tenant::CreateTenant;
use aula_core::models::user::CreateUser;
use aula_core::repository::{
    CampusRepository, PermissionRepository, RoleRepository, TenantRepository, UserRepository,
};
use aula_db::repository::{
    SurrealCampusRepository, SurrealPermissionRepository, SurrealRoleRepository,
    SurrealTenantRepository, SurrealUserRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

/// Helper: spin up in-memory DB, run migrations, create tenant + user + campus.
async fn setup() -> (
    Surreal<surrealdb::engine::local::Db>,
    Uuid, // tenant_id
    Uuid, // user_id
    Uuid, // campus_id
) {
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

    let user_repo = SurrealUserRepository::new(db.clone());
    let user = user_repo
        .create(CreateUser {
            tenant_id: tenant.id,
            subject: "idp|alice".into(),
            email: "alice@example.com".into(),
            name: Some("Alice".into()),
        })
        .await
        .unwrap();

    let campus_repo = SurrealCampusRepository::new(db.clone());
    let campus = campus_repo
        .create(CreateCampus {
            tenant_id: tenant.id,
            name: "Main Campus".into(),
            code: "MAIN".into(),
            location: None,
        })
        .await
        .unwrap();

    (db, tenant.id, user.id, campus.id)
}

fn role_input(tenant_id: Uuid, name: &str, level: u8) -> CreateRole {
    CreateRole {
        tenant_id,
        name: name.into(),
        level,
        description: format!("{name} role"),
        is_system: false,
    }
}

fn permission_input(tenant_id: Uuid, resource: &str, action: &str) -> CreatePermission {
    CreatePermission {
        tenant_id,
        name: format!("{resource}.{action}"),
        resource: resource.into(),
        action: action.into(),
        description: String::new(),
    }
}

// ---------------------------------------------------------------------------
// Role tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_and_get_role() {
    let (db, tenant_id, _, _) = setup().await;
    let repo = SurrealRoleRepository::new(db);

    let role = repo
        .create(role_input(tenant_id, "School Admin", 3))
        .await
        .unwrap();

    assert_eq!(role.tenant_id, tenant_id);
    assert_eq!(role.name, "School Admin");
    assert_eq!(role.level, 3);
    assert!(!role.is_system);

    let fetched = repo.get_by_id(tenant_id, role.id).await.unwrap();
    assert_eq!(fetched.id, role.id);
}

#[tokio::test]
async fn role_level_out_of_range_rejected() {
    let (db, tenant_id, _, _) = setup().await;
    let repo = SurrealRoleRepository::new(db);

    let err = repo
        .create(role_input(tenant_id, "Too Deep", 6))
        .await
        .unwrap_err();

    assert!(
        matches!(err, AulaError::Validation { .. }),
        "expected Validation, got: {err:?}"
    );
}

#[tokio::test]
async fn update_role() {
    let (db, tenant_id, _, _) = setup().await;
    let repo = SurrealRoleRepository::new(db);

    let role = repo
        .create(role_input(tenant_id, "Teacher", 4))
        .await
        .unwrap();

    let updated = repo
        .update(
            tenant_id,
            role.id,
            UpdateRole {
                name: Some("Senior Teacher".into()),
                level: Some(3),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Senior Teacher");
    assert_eq!(updated.level, 3);
    assert_eq!(updated.description, "Teacher role"); // unchanged
}

#[tokio::test]
async fn delete_role() {
    let (db, tenant_id, _, _) = setup().await;
    let repo = SurrealRoleRepository::new(db);

    let role = repo
        .create(role_input(tenant_id, "Temp", 5))
        .await
        .unwrap();

    repo.delete(tenant_id, role.id).await.unwrap();

    let result = repo.get_by_id(tenant_id, role.id).await;
    assert!(result.is_err(), "deleted role should not be found");
}

#[tokio::test]
async fn system_role_refuses_deletion() {
    let (db, tenant_id, _, _) = setup().await;
    let repo = SurrealRoleRepository::new(db);

    let role = repo
        .create(CreateRole {
            tenant_id,
            name: "Master Admin".into(),
            level: 0,
            description: "Platform owner".into(),
            is_system: true,
        })
        .await
        .unwrap();

    let err = repo.delete(tenant_id, role.id).await.unwrap_err();
    assert!(matches!(err, AulaError::Validation { .. }));

    // Still resolvable.
    assert!(repo.get_by_id(tenant_id, role.id).await.is_ok());
}

#[tokio::test]
async fn duplicate_role_name_rejected() {
    let (db, tenant_id, _, _) = setup().await;
    let repo = SurrealRoleRepository::new(db);

    repo.create(role_input(tenant_id, "Unique", 4))
        .await
        .unwrap();

    let result = repo.create(role_input(tenant_id, "Unique", 2)).await;
    assert!(result.is_err(), "duplicate role name should be rejected");
}

#[tokio::test]
async fn assign_and_get_user_roles() {
    let (db, tenant_id, user_id, _) = setup().await;
    let repo = SurrealRoleRepository::new(db);

    let role = repo
        .create(role_input(tenant_id, "Teacher", 4))
        .await
        .unwrap();

    repo.assign_to_user(tenant_id, user_id, role.id, None)
        .await
        .unwrap();

    let roles = repo.get_user_roles(tenant_id, user_id).await.unwrap();
    assert_eq!(roles.len(), 1);
    assert_eq!(roles[0].name, "Teacher");

    // Unassign and verify.
    repo.unassign_from_user(tenant_id, user_id, role.id, None)
        .await
        .unwrap();

    let roles = repo.get_user_roles(tenant_id, user_id).await.unwrap();
    assert!(roles.is_empty());
}

#[tokio::test]
async fn campus_scoped_role_assignment() {
    let (db, tenant_id, user_id, campus_id) = setup().await;
    let repo = SurrealRoleRepository::new(db);

    let role = repo
        .create(role_input(tenant_id, "Campus Head", 3))
        .await
        .unwrap();

    repo.assign_to_user(tenant_id, user_id, role.id, Some(campus_id))
        .await
        .unwrap();

    let roles = repo.get_user_roles(tenant_id, user_id).await.unwrap();
    assert_eq!(roles.len(), 1);

    // Unassign with matching campus scope.
    repo.unassign_from_user(tenant_id, user_id, role.id, Some(campus_id))
        .await
        .unwrap();

    let roles = repo.get_user_roles(tenant_id, user_id).await.unwrap();
    assert!(roles.is_empty());
}

#[tokio::test]
async fn same_role_on_two_campuses_deduplicates() {
    let (db, tenant_id, user_id, campus_id) = setup().await;
    let campus_repo = SurrealCampusRepository::new(db.clone());
    let repo = SurrealRoleRepository::new(db);

    let second_campus = campus_repo
        .create(CreateCampus {
            tenant_id,
            name: "North".into(),
            code: "NORTH".into(),
            location: None,
        })
        .await
        .unwrap();

    let role = repo
        .create(role_input(tenant_id, "Teacher", 4))
        .await
        .unwrap();

    repo.assign_to_user(tenant_id, user_id, role.id, Some(campus_id))
        .await
        .unwrap();
    repo.assign_to_user(tenant_id, user_id, role.id, Some(second_campus.id))
        .await
        .unwrap();

    let roles = repo.get_user_roles(tenant_id, user_id).await.unwrap();
    assert_eq!(roles.len(), 1, "same role across campuses is one role");
}

// ---------------------------------------------------------------------------
// Permission tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_and_get_permission() {
    let (db, tenant_id, _, _) = setup().await;
    let repo = SurrealPermissionRepository::new(db);

    let perm = repo
        .create(permission_input(tenant_id, "attendance", "record"))
        .await
        .unwrap();

    assert_eq!(perm.resource, "attendance");
    assert_eq!(perm.action, "record");
    assert_eq!(perm.tenant_id, tenant_id);

    let fetched = repo.get_by_id(tenant_id, perm.id).await.unwrap();
    assert_eq!(fetched.id, perm.id);
}

#[tokio::test]
async fn duplicate_resource_action_pair_rejected() {
    let (db, tenant_id, _, _) = setup().await;
    let repo = SurrealPermissionRepository::new(db);

    repo.create(permission_input(tenant_id, "invoice", "void"))
        .await
        .unwrap();

    let result = repo
        .create(permission_input(tenant_id, "invoice", "void"))
        .await;
    assert!(result.is_err(), "duplicate (resource, action) rejected");

    // Same resource, different action is a distinct permission.
    let other = repo
        .create(permission_input(tenant_id, "invoice", "issue"))
        .await;
    assert!(other.is_ok());
}

#[tokio::test]
async fn same_pair_allowed_in_different_tenants() {
    let (db, tenant_id, _, _) = setup().await;
    let tenant_repo = SurrealTenantRepository::new(db.clone());
    let repo = SurrealPermissionRepository::new(db);

    let other_tenant = tenant_repo
        .create(CreateTenant {
            name: "Other School".into(),
            slug: "other-school".into(),
            subdomain: "other-school".into(),
            country: None,
            timezone: None,
            currency: None,
        })
        .await
        .unwrap();

    repo.create(permission_input(tenant_id, "payroll", "approve"))
        .await
        .unwrap();

    let result = repo
        .create(permission_input(other_tenant.id, "payroll", "approve"))
        .await;
    assert!(result.is_ok(), "pair uniqueness is per-tenant");
}

#[tokio::test]
async fn grant_and_get_role_permissions() {
    let (db, tenant_id, _, _) = setup().await;
    let role_repo = SurrealRoleRepository::new(db.clone());
    let perm_repo = SurrealPermissionRepository::new(db);

    let role = role_repo
        .create(role_input(tenant_id, "Accountant", 4))
        .await
        .unwrap();

    let view = perm_repo
        .create(permission_input(tenant_id, "invoice", "view"))
        .await
        .unwrap();
    let void = perm_repo
        .create(permission_input(tenant_id, "invoice", "void"))
        .await
        .unwrap();

    perm_repo
        .grant_to_role(tenant_id, role.id, view.id)
        .await
        .unwrap();
    perm_repo
        .grant_to_role(tenant_id, role.id, void.id)
        .await
        .unwrap();

    let perms = perm_repo
        .get_role_permissions(tenant_id, role.id)
        .await
        .unwrap();
    assert_eq!(perms.len(), 2);

    let actions: Vec<&str> = perms.iter().map(|p| p.action.as_str()).collect();
    assert!(actions.contains(&"view"));
    assert!(actions.contains(&"void"));
}

#[tokio::test]
async fn revoke_permission_from_role() {
    let (db, tenant_id, _, _) = setup().await;
    let role_repo = SurrealRoleRepository::new(db.clone());
    let perm_repo = SurrealPermissionRepository::new(db);

    let role = role_repo
        .create(role_input(tenant_id, "Registrar", 4))
        .await
        .unwrap();

    let perm = perm_repo
        .create(permission_input(tenant_id, "student", "enroll"))
        .await
        .unwrap();

    perm_repo
        .grant_to_role(tenant_id, role.id, perm.id)
        .await
        .unwrap();

    let perms = perm_repo
        .get_role_permissions(tenant_id, role.id)
        .await
        .unwrap();
    assert_eq!(perms.len(), 1);

    perm_repo
        .revoke_from_role(tenant_id, role.id, perm.id)
        .await
        .unwrap();

    let perms = perm_repo
        .get_role_permissions(tenant_id, role.id)
        .await
        .unwrap();
    assert!(perms.is_empty());
}
