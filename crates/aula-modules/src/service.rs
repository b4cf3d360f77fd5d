//! Module installer — per-tenant install/uninstall orchestration.

use std::collections::HashSet;
use std::sync::Arc;

use aula_core::error::{AulaError, AulaResult};
use aula_core::models::module::Module;
use aula_core::models::tenant_module::{InstallStatus, InstalledModuleView, TenantModule};
use aula_core::repository::{ModuleCatalogRepository, TenantModuleRepository};
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::catalog::{CatalogService, CatalogSnapshot};
use crate::error::ModuleError;

/// Applies install/uninstall operations against a tenant's module state.
///
/// Install and uninstall are check-then-act sequences against shared
/// per-tenant state, so they serialize on a per-(tenant, module) async
/// lock. Everything else (reads, config updates on distinct records) is
/// lock-free. Tenants are fully independent — no cross-tenant ordering
/// exists anywhere.
pub struct ModuleService<M: ModuleCatalogRepository, T: TenantModuleRepository> {
    catalog: Arc<CatalogService<M>>,
    tenant_modules: T,
    install_locks: DashMap<(Uuid, Uuid), Arc<Mutex<()>>>,
}

impl<M: ModuleCatalogRepository, T: TenantModuleRepository> ModuleService<M, T> {
    pub fn new(catalog: Arc<CatalogService<M>>, tenant_modules: T) -> Self {
        Self {
            catalog,
            tenant_modules,
            install_locks: DashMap::new(),
        }
    }

    fn pair_lock(&self, tenant_id: Uuid, module_id: Uuid) -> Arc<Mutex<()>> {
        self.install_locks
            .entry((tenant_id, module_id))
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn resolve<'a>(snapshot: &'a CatalogSnapshot, module_id: Uuid) -> AulaResult<&'a Module> {
        snapshot.get(module_id).ok_or_else(|| AulaError::NotFound {
            entity: "module".into(),
            id: module_id.to_string(),
        })
    }

    /// Install a module for a tenant.
    ///
    /// Rejects with `AlreadyInstalled` if an active (non-uninstalled)
    /// record exists, and with `MissingDependency` naming every unmet
    /// direct prerequisite. On success a fresh record is created with
    /// status Installed and the supplied configuration (or `{}`).
    pub async fn install(
        &self,
        tenant_id: Uuid,
        module_id: Uuid,
        config: Option<serde_json::Value>,
    ) -> AulaResult<TenantModule> {
        let snapshot = self.catalog.current();
        let module = Self::resolve(&snapshot, module_id)?;

        let lock = self.pair_lock(tenant_id, module_id);
        let _guard = lock.lock().await;

        if self
            .tenant_modules
            .find_active(tenant_id, module_id)
            .await?
            .is_some()
        {
            return Err(ModuleError::AlreadyInstalled(module.slug.clone()).into());
        }

        let records = self.tenant_modules.list_by_tenant(tenant_id).await?;
        let installed: HashSet<Uuid> = records
            .iter()
            .filter(|tm| tm.status == InstallStatus::Installed)
            .map(|tm| tm.module_id)
            .collect();

        let missing = snapshot.missing_dependencies(module, &installed);
        if !missing.is_empty() {
            return Err(ModuleError::MissingDependency(snapshot.slugs_of(&missing)).into());
        }

        let config = config.unwrap_or(serde_json::Value::Object(Default::default()));
        let record = self
            .tenant_modules
            .insert(tenant_id, module_id, config)
            .await?;

        info!(%tenant_id, module = %module.slug, "module installed");
        Ok(record)
    }

    /// Uninstall a module for a tenant.
    ///
    /// The record is retained and transitioned to Uninstalled with the
    /// removal time stamped. Core modules refuse removal unconditionally;
    /// a module that other installed modules list as required is blocked
    /// until those dependents are removed first.
    pub async fn uninstall(&self, tenant_id: Uuid, module_id: Uuid) -> AulaResult<TenantModule> {
        let snapshot = self.catalog.current();
        let module = Self::resolve(&snapshot, module_id)?;

        let lock = self.pair_lock(tenant_id, module_id);
        let _guard = lock.lock().await;

        let active = self
            .tenant_modules
            .find_active(tenant_id, module_id)
            .await?
            .ok_or_else(|| ModuleError::NotInstalled(module.slug.clone()))?;

        if module.is_core {
            return Err(ModuleError::CoreModuleProtected(module.slug.clone()).into());
        }

        let records = self.tenant_modules.list_by_tenant(tenant_id).await?;
        let blockers = snapshot.blocking_dependents(module_id, &records);
        if !blockers.is_empty() {
            return Err(ModuleError::DependentModulesExist(snapshot.slugs_of(&blockers)).into());
        }

        let record = self
            .tenant_modules
            .set_status(active.id, InstallStatus::Uninstalled)
            .await?;

        info!(%tenant_id, module = %module.slug, "module uninstalled");
        Ok(record)
    }

    /// Disable an installed module without removing it.
    pub async fn disable(&self, tenant_id: Uuid, module_id: Uuid) -> AulaResult<TenantModule> {
        self.transition(tenant_id, module_id, InstallStatus::Installed, InstallStatus::Disabled)
            .await
    }

    /// Re-enable a disabled module.
    pub async fn enable(&self, tenant_id: Uuid, module_id: Uuid) -> AulaResult<TenantModule> {
        self.transition(tenant_id, module_id, InstallStatus::Disabled, InstallStatus::Installed)
            .await
    }

    async fn transition(
        &self,
        tenant_id: Uuid,
        module_id: Uuid,
        from: InstallStatus,
        to: InstallStatus,
    ) -> AulaResult<TenantModule> {
        let snapshot = self.catalog.current();
        let module = Self::resolve(&snapshot, module_id)?;

        let lock = self.pair_lock(tenant_id, module_id);
        let _guard = lock.lock().await;

        let active = self
            .tenant_modules
            .find_active(tenant_id, module_id)
            .await?
            .ok_or_else(|| ModuleError::NotInstalled(module.slug.clone()))?;

        if active.status != from {
            return Err(ModuleError::InvalidTransition {
                module: module.slug.clone(),
                status: format!("{:?}", active.status),
            }
            .into());
        }

        self.tenant_modules.set_status(active.id, to).await
    }

    /// Replace a record's configuration blob. No validation happens
    /// here — each module owns its own configuration contract.
    pub async fn update_config(
        &self,
        tenant_module_id: Uuid,
        config: serde_json::Value,
    ) -> AulaResult<TenantModule> {
        self.tenant_modules
            .update_config(tenant_module_id, config)
            .await
    }

    /// Catalog metadata merged with per-tenant state for every active
    /// (installed or disabled) record of the tenant.
    pub async fn list_installed(&self, tenant_id: Uuid) -> AulaResult<Vec<InstalledModuleView>> {
        let snapshot = self.catalog.current();
        let records = self.tenant_modules.list_by_tenant(tenant_id).await?;

        let mut views = Vec::new();
        for record in records {
            if record.status == InstallStatus::Uninstalled {
                continue;
            }
            let module = Self::resolve(&snapshot, record.module_id)?;
            views.push(InstalledModuleView {
                module: module.clone(),
                tenant_module_id: record.id,
                status: record.status,
                config: record.config,
                installed_at: record.installed_at,
            });
        }

        Ok(views)
    }

    /// The catalog service backing this installer.
    pub fn catalog(&self) -> &CatalogService<M> {
        &self.catalog
    }
}
