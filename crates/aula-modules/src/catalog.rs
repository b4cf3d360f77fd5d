//! Immutable module catalog snapshots.
//!
//! The catalog is process-wide shared reference data. Read paths hold an
//! `Arc` to a [`CatalogSnapshot`] that never changes underneath them;
//! administrative writes go to the store and become visible through an
//! explicit [`CatalogService::refresh`], which swaps the snapshot
//! atomically.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use arc_swap::ArcSwap;
use aula_core::error::AulaResult;
use aula_core::models::module::Module;
use aula_core::models::tenant_module::{InstallStatus, TenantModule};
use aula_core::repository::ModuleCatalogRepository;
use tracing::info;
use uuid::Uuid;

/// A point-in-time, immutable view of the module catalog.
#[derive(Debug)]
pub struct CatalogSnapshot {
    version: u64,
    modules: HashMap<Uuid, Module>,
    by_slug: HashMap<String, Uuid>,
}

impl CatalogSnapshot {
    pub fn new(version: u64, modules: Vec<Module>) -> Self {
        let by_slug = modules.iter().map(|m| (m.slug.clone(), m.id)).collect();
        let modules = modules.into_iter().map(|m| (m.id, m)).collect();
        Self {
            version,
            modules,
            by_slug,
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&Module> {
        self.modules.get(&id)
    }

    pub fn get_by_slug(&self, slug: &str) -> Option<&Module> {
        self.by_slug.get(slug).and_then(|id| self.modules.get(id))
    }

    /// The declared direct prerequisites of a module. Dependencies are
    /// checked exactly one level deep — transitive prerequisites are the
    /// responsibility of whoever declared them on their own entries.
    pub fn required_modules_of(&self, id: Uuid) -> &[Uuid] {
        self.modules
            .get(&id)
            .map(|m| m.required_modules.as_slice())
            .unwrap_or(&[])
    }

    /// Direct prerequisites of `module` that are absent from
    /// `installed` (the set of module ids currently installed for the
    /// tenant). Empty result means the module may be installed.
    pub fn missing_dependencies(&self, module: &Module, installed: &HashSet<Uuid>) -> Vec<Uuid> {
        module
            .required_modules
            .iter()
            .filter(|dep| !installed.contains(dep))
            .copied()
            .collect()
    }

    /// Modules currently installed for the tenant whose declared
    /// requirements include `target`. Non-empty result blocks removal.
    /// Disabled and uninstalled records do not block.
    pub fn blocking_dependents(&self, target: Uuid, tenant_modules: &[TenantModule]) -> Vec<Uuid> {
        tenant_modules
            .iter()
            .filter(|tm| tm.status == InstallStatus::Installed && tm.module_id != target)
            .filter(|tm| self.required_modules_of(tm.module_id).contains(&target))
            .map(|tm| tm.module_id)
            .collect()
    }

    /// Resolve module ids to slugs for operator-facing error messages,
    /// falling back to the raw id for entries missing from the snapshot.
    pub fn slugs_of(&self, ids: &[Uuid]) -> Vec<String> {
        ids.iter()
            .map(|id| {
                self.modules
                    .get(id)
                    .map(|m| m.slug.clone())
                    .unwrap_or_else(|| id.to_string())
            })
            .collect()
    }
}

/// Loads and shares catalog snapshots.
///
/// Cheap to read from any number of tasks; refreshed only through
/// explicit administrative calls.
pub struct CatalogService<M: ModuleCatalogRepository> {
    repo: M,
    snapshot: ArcSwap<CatalogSnapshot>,
}

impl<M: ModuleCatalogRepository> CatalogService<M> {
    /// Load the full catalog from the store and build the initial
    /// snapshot.
    pub async fn load(repo: M) -> AulaResult<Self> {
        let modules = repo.list_all().await?;
        info!(modules = modules.len(), "module catalog loaded");
        let snapshot = ArcSwap::from_pointee(CatalogSnapshot::new(1, modules));
        Ok(Self { repo, snapshot })
    }

    /// The current snapshot. Callers keep the returned `Arc` for the
    /// duration of one logical operation so decisions within it are
    /// consistent.
    pub fn current(&self) -> Arc<CatalogSnapshot> {
        self.snapshot.load_full()
    }

    /// Re-read the catalog from the store and atomically publish a new
    /// snapshot. In-flight readers keep their old snapshot.
    pub async fn refresh(&self) -> AulaResult<Arc<CatalogSnapshot>> {
        let modules = self.repo.list_all().await?;
        let version = self.snapshot.load().version() + 1;
        let next = Arc::new(CatalogSnapshot::new(version, modules));
        self.snapshot.store(next.clone());
        info!(version, modules = next.len(), "module catalog refreshed");
        Ok(next)
    }

    /// Direct access to the underlying catalog repository, for
    /// administrative writes that precede a refresh.
    pub fn repo(&self) -> &M {
        &self.repo
    }
}
