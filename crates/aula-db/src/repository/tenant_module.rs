//! SurrealDB implementation of [`TenantModuleRepository`].
//!
//! Installation records are soft-state: `set_status` transitions them,
//! nothing here deletes. The uninstall timestamp is stamped exactly once,
//! on the transition into `Uninstalled`.

use aula_core::error::AulaResult;
use aula_core::models::tenant_module::{InstallStatus, TenantModule};
use aula_core::repository::TenantModuleRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct TenantModuleRow {
    tenant_id: String,
    module_id: String,
    status: String,
    config: serde_json::Value,
    installed_at: DateTime<Utc>,
    uninstalled_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TenantModuleRow {
    fn into_tenant_module(self, id: Uuid) -> Result<TenantModule, DbError> {
        let tenant_id = Uuid::parse_str(&self.tenant_id)
            .map_err(|e| DbError::Migration(format!("invalid tenant UUID: {e}")))?;
        let module_id = Uuid::parse_str(&self.module_id)
            .map_err(|e| DbError::Migration(format!("invalid module UUID: {e}")))?;
        Ok(TenantModule {
            id,
            tenant_id,
            module_id,
            status: parse_status(&self.status)?,
            config: self.config,
            installed_at: self.installed_at,
            uninstalled_at: self.uninstalled_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct TenantModuleRowWithId {
    record_id: String,
    tenant_id: String,
    module_id: String,
    status: String,
    config: serde_json::Value,
    installed_at: DateTime<Utc>,
    uninstalled_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TenantModuleRowWithId {
    fn try_into_tenant_module(self) -> Result<TenantModule, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        let tenant_id = Uuid::parse_str(&self.tenant_id)
            .map_err(|e| DbError::Migration(format!("invalid tenant UUID: {e}")))?;
        let module_id = Uuid::parse_str(&self.module_id)
            .map_err(|e| DbError::Migration(format!("invalid module UUID: {e}")))?;
        Ok(TenantModule {
            id,
            tenant_id,
            module_id,
            status: parse_status(&self.status)?,
            config: self.config,
            installed_at: self.installed_at,
            uninstalled_at: self.uninstalled_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn parse_status(s: &str) -> Result<InstallStatus, DbError> {
    match s {
        "Installed" => Ok(InstallStatus::Installed),
        "Disabled" => Ok(InstallStatus::Disabled),
        "Uninstalled" => Ok(InstallStatus::Uninstalled),
        other => Err(DbError::Migration(format!(
            "unknown install status: {other}"
        ))),
    }
}

fn status_to_string(s: &InstallStatus) -> &'static str {
    match s {
        InstallStatus::Installed => "Installed",
        InstallStatus::Disabled => "Disabled",
        InstallStatus::Uninstalled => "Uninstalled",
    }
}

/// SurrealDB implementation of the tenant module repository.
#[derive(Clone)]
pub struct SurrealTenantModuleRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealTenantModuleRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> TenantModuleRepository for SurrealTenantModuleRepository<C> {
    async fn insert(
        &self,
        tenant_id: Uuid,
        module_id: Uuid,
        config: serde_json::Value,
    ) -> AulaResult<TenantModule> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('tenant_module', $id) SET \
                 tenant_id = $tenant_id, module_id = $module_id, \
                 status = 'Installed', config = $config",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("module_id", module_id.to_string()))
            .bind(("config", config))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<TenantModuleRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "tenant_module".into(),
            id: id_str,
        })?;

        Ok(row.into_tenant_module(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> AulaResult<TenantModule> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('tenant_module', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TenantModuleRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "tenant_module".into(),
            id: id_str,
        })?;

        Ok(row.into_tenant_module(id)?)
    }

    async fn find_active(
        &self,
        tenant_id: Uuid,
        module_id: Uuid,
    ) -> AulaResult<Option<TenantModule>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM tenant_module \
                 WHERE tenant_id = $tenant_id \
                 AND module_id = $module_id \
                 AND status != 'Uninstalled'",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .bind(("module_id", module_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TenantModuleRowWithId> = result.take(0).map_err(DbError::from)?;

        match rows.into_iter().next() {
            Some(row) => Ok(Some(row.try_into_tenant_module()?)),
            None => Ok(None),
        }
    }

    async fn set_status(&self, id: Uuid, status: InstallStatus) -> AulaResult<TenantModule> {
        let id_str = id.to_string();

        let query = if status == InstallStatus::Uninstalled {
            "UPDATE type::record('tenant_module', $id) SET \
             status = $status, uninstalled_at = time::now(), \
             updated_at = time::now()"
        } else {
            "UPDATE type::record('tenant_module', $id) SET \
             status = $status, updated_at = time::now()"
        };

        let result = self
            .db
            .query(query)
            .bind(("id", id_str.clone()))
            .bind(("status", status_to_string(&status).to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<TenantModuleRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "tenant_module".into(),
            id: id_str,
        })?;

        Ok(row.into_tenant_module(id)?)
    }

    async fn update_config(
        &self,
        id: Uuid,
        config: serde_json::Value,
    ) -> AulaResult<TenantModule> {
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "UPDATE type::record('tenant_module', $id) SET \
                 config = $config, updated_at = time::now()",
            )
            .bind(("id", id_str.clone()))
            .bind(("config", config))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<TenantModuleRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "tenant_module".into(),
            id: id_str,
        })?;

        Ok(row.into_tenant_module(id)?)
    }

    async fn list_by_tenant(&self, tenant_id: Uuid) -> AulaResult<Vec<TenantModule>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM tenant_module \
                 WHERE tenant_id = $tenant_id \
                 ORDER BY created_at ASC",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TenantModuleRowWithId> = result.take(0).map_err(DbError::from)?;

        let records = rows
            .into_iter()
            .map(|row| row.try_into_tenant_module())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(records)
    }
}
