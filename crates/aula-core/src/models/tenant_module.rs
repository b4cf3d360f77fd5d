//! Per-tenant module installation records.
//!
//! Records are soft-state: uninstalling transitions the status rather
//! than deleting, preserving audit history. At most one active
//! (non-uninstalled) record exists per (tenant, module) pair; a later
//! reinstall creates a fresh record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::module::Module;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum InstallStatus {
    Installed,
    Disabled,
    Uninstalled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantModule {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub module_id: Uuid,
    pub status: InstallStatus,
    /// Tenant-specific configuration. Opaque at this layer — each
    /// module's own logic validates its shape.
    pub config: serde_json::Value,
    pub installed_at: DateTime<Utc>,
    pub uninstalled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Catalog metadata merged with per-tenant installation state, as
/// surfaced to admin UIs listing a tenant's modules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstalledModuleView {
    pub module: Module,
    pub tenant_module_id: Uuid,
    pub status: InstallStatus,
    pub config: serde_json::Value,
    pub installed_at: DateTime<Utc>,
}
