//! AULA Server — application entry point.
//!
//! Hosts the access evaluator and module installer over a shared
//! SurrealDB connection. Request transports (HTTP, RPC) are mounted by
//! the deployment layer and consume the services built here.

use std::sync::Arc;

use aula_access::AccessEvaluator;
use aula_db::repository::{
    SurrealModuleCatalogRepository, SurrealPermissionRepository, SurrealRoleRepository,
    SurrealTenantModuleRepository,
};
use aula_db::{DbConfig, DbManager};
use aula_modules::{CatalogService, ModuleService};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("aula=info".parse()?))
        .json()
        .init();

    tracing::info!("Starting AULA server...");

    let config = DbConfig::from_env();
    let manager = DbManager::connect(&config).await?;
    let db = manager.client().clone();

    aula_db::run_migrations(&db).await?;

    let catalog = Arc::new(
        CatalogService::load(SurrealModuleCatalogRepository::new(db.clone())).await?,
    );

    // Long-lived service handles, consumed by whatever transport the
    // deployment mounts; the host itself only waits for shutdown.
    let _evaluator = AccessEvaluator::new(
        SurrealRoleRepository::new(db.clone()),
        SurrealPermissionRepository::new(db.clone()),
    );
    let _modules = ModuleService::new(catalog.clone(), SurrealTenantModuleRepository::new(db));

    tracing::info!(
        catalog_modules = catalog.current().len(),
        "AULA server ready"
    );

    tokio::signal::ctrl_c().await?;
    tracing::info!("AULA server stopped.");

    Ok(())
}
