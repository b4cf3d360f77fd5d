//! Integration tests for the module catalog and tenant module
//! repositories using in-memory SurrealDB.

use aula_core::models::module::{CreateModule, ModuleCategory, ModuleStatus};
use aula_core::models::tenant::CreateTenant;
use aula_core::models::tenant_module::InstallStatus;
use aula_core::repository::{ModuleCatalogRepository, TenantModuleRepository, TenantRepository};
use aula_db::repository::{
    SurrealModuleCatalogRepository, SurrealTenantModuleRepository, SurrealTenantRepository,
};
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

fn module_input(slug: &str, category: ModuleCategory, required: Vec<Uuid>) -> CreateModule {
    CreateModule {
        name: slug.to_uppercase(),
        slug: slug.into(),
        version: "1.0.0".into(),
        category,
        description: None,
        is_core: false,
        required_modules: required,
    }
}

// ---------------------------------------------------------------------------
// Catalog tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_and_get_module() {
    let (db, _) = setup().await;
    let repo = SurrealModuleCatalogRepository::new(db);

    let module = repo
        .create(module_input("gradebook", ModuleCategory::Academic, vec![]))
        .await
        .unwrap();

    assert_eq!(module.slug, "gradebook");
    assert_eq!(module.status, ModuleStatus::Available);
    assert!(!module.is_core);

    let by_id = repo.get_by_id(module.id).await.unwrap();
    assert_eq!(by_id.slug, "gradebook");

    let by_slug = repo.get_by_slug("gradebook").await.unwrap();
    assert_eq!(by_slug.id, module.id);
}

#[tokio::test]
async fn required_modules_round_trip() {
    let (db, _) = setup().await;
    let repo = SurrealModuleCatalogRepository::new(db);

    let academics = repo
        .create(module_input("academics", ModuleCategory::Academic, vec![]))
        .await
        .unwrap();

    let gradebook = repo
        .create(module_input(
            "gradebook",
            ModuleCategory::Academic,
            vec![academics.id],
        ))
        .await
        .unwrap();

    assert_eq!(gradebook.required_modules, vec![academics.id]);

    let fetched = repo.get_by_id(gradebook.id).await.unwrap();
    assert_eq!(fetched.required_modules, vec![academics.id]);
}

#[tokio::test]
async fn duplicate_slug_rejected() {
    let (db, _) = setup().await;
    let repo = SurrealModuleCatalogRepository::new(db);

    repo.create(module_input("gradebook", ModuleCategory::Academic, vec![]))
        .await
        .unwrap();

    let result = repo
        .create(module_input("gradebook", ModuleCategory::Finance, vec![]))
        .await;
    assert!(result.is_err(), "duplicate slug should be rejected");
}

#[tokio::test]
async fn deprecation_hides_from_available_but_still_resolves() {
    let (db, _) = setup().await;
    let repo = SurrealModuleCatalogRepository::new(db);

    let module = repo
        .create(module_input("legacy", ModuleCategory::Operations, vec![]))
        .await
        .unwrap();

    assert_eq!(repo.list_available().await.unwrap().len(), 1);

    let deprecated = repo
        .set_status(module.id, ModuleStatus::Deprecated)
        .await
        .unwrap();
    assert_eq!(deprecated.status, ModuleStatus::Deprecated);

    // Gone from the storefront, still resolvable by id and in list_all.
    assert!(repo.list_available().await.unwrap().is_empty());
    assert!(repo.get_by_id(module.id).await.is_ok());
    assert_eq!(repo.list_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn list_by_category_filters() {
    let (db, _) = setup().await;
    let repo = SurrealModuleCatalogRepository::new(db);

    repo.create(module_input("gradebook", ModuleCategory::Academic, vec![]))
        .await
        .unwrap();
    repo.create(module_input("payroll", ModuleCategory::Hr, vec![]))
        .await
        .unwrap();

    let academic = repo
        .list_by_category(ModuleCategory::Academic)
        .await
        .unwrap();
    assert_eq!(academic.len(), 1);
    assert_eq!(academic[0].slug, "gradebook");
}

// ---------------------------------------------------------------------------
// Tenant module tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn insert_and_find_active() {
    let (db, tenant_id) = setup().await;
    let catalog = SurrealModuleCatalogRepository::new(db.clone());
    let repo = SurrealTenantModuleRepository::new(db);

    let module = catalog
        .create(module_input("gradebook", ModuleCategory::Academic, vec![]))
        .await
        .unwrap();

    let record = repo
        .insert(
            tenant_id,
            module.id,
            serde_json::json!({"grading_scale": "A-E"}),
        )
        .await
        .unwrap();

    assert_eq!(record.status, InstallStatus::Installed);
    assert_eq!(record.config["grading_scale"], "A-E");
    assert!(record.uninstalled_at.is_none());

    let active = repo.find_active(tenant_id, module.id).await.unwrap();
    assert_eq!(active.unwrap().id, record.id);
}

#[tokio::test]
async fn uninstall_transition_stamps_removal_time() {
    let (db, tenant_id) = setup().await;
    let catalog = SurrealModuleCatalogRepository::new(db.clone());
    let repo = SurrealTenantModuleRepository::new(db);

    let module = catalog
        .create(module_input("library", ModuleCategory::Operations, vec![]))
        .await
        .unwrap();

    let record = repo
        .insert(tenant_id, module.id, serde_json::json!({}))
        .await
        .unwrap();

    let removed = repo
        .set_status(record.id, InstallStatus::Uninstalled)
        .await
        .unwrap();
    assert_eq!(removed.status, InstallStatus::Uninstalled);
    assert!(removed.uninstalled_at.is_some());

    // No longer active, but the record survives for audit.
    assert!(
        repo.find_active(tenant_id, module.id)
            .await
            .unwrap()
            .is_none()
    );
    assert_eq!(repo.list_by_tenant(tenant_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn disabled_record_is_still_active() {
    let (db, tenant_id) = setup().await;
    let catalog = SurrealModuleCatalogRepository::new(db.clone());
    let repo = SurrealTenantModuleRepository::new(db);

    let module = catalog
        .create(module_input("messaging", ModuleCategory::Communication, vec![]))
        .await
        .unwrap();

    let record = repo
        .insert(tenant_id, module.id, serde_json::json!({}))
        .await
        .unwrap();

    repo.set_status(record.id, InstallStatus::Disabled)
        .await
        .unwrap();

    let active = repo.find_active(tenant_id, module.id).await.unwrap();
    assert_eq!(active.unwrap().status, InstallStatus::Disabled);
}

#[tokio::test]
async fn update_config_replaces_blob() {
    let (db, tenant_id) = setup().await;
    let catalog = SurrealModuleCatalogRepository::new(db.clone());
    let repo = SurrealTenantModuleRepository::new(db);

    let module = catalog
        .create(module_input("sms", ModuleCategory::Communication, vec![]))
        .await
        .unwrap();

    let record = repo
        .insert(tenant_id, module.id, serde_json::json!({"provider": "a"}))
        .await
        .unwrap();

    let updated = repo
        .update_config(
            record.id,
            serde_json::json!({"provider": "b", "sender_id": "SCHOOL"}),
        )
        .await
        .unwrap();

    assert_eq!(updated.config["provider"], "b");
    assert_eq!(updated.config["sender_id"], "SCHOOL");
}
