//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Tenant-scoped repositories
//! require a `tenant_id` parameter to enforce data isolation — the
//! evaluator and installer never infer the tenant from the subject.

use uuid::Uuid;

use crate::error::AulaResult;
use crate::models::{
    campus::{Campus, CreateCampus},
    module::{CreateModule, Module, ModuleCategory, ModuleStatus},
    permission::{CreatePermission, Permission, UpdatePermission},
    role::{CreateRole, Role, UpdateRole},
    tenant::{CreateTenant, Tenant, UpdateTenant},
    tenant_module::{InstallStatus, TenantModule},
    user::{CreateUser, UpdateUser, User},
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

// ---------------------------------------------------------------------------
// Tenant & Campus
// ---------------------------------------------------------------------------

pub trait TenantRepository: Send + Sync {
    /// Create a tenant. Fails if the slug or subdomain is already taken.
    fn create(&self, input: CreateTenant) -> impl Future<Output = AulaResult<Tenant>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = AulaResult<Tenant>> + Send;
    fn get_by_slug(&self, slug: &str) -> impl Future<Output = AulaResult<Tenant>> + Send;
    fn get_by_subdomain(&self, subdomain: &str)
    -> impl Future<Output = AulaResult<Tenant>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateTenant,
    ) -> impl Future<Output = AulaResult<Tenant>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = AulaResult<PaginatedResult<Tenant>>> + Send;
}

pub trait CampusRepository: Send + Sync {
    fn create(&self, input: CreateCampus) -> impl Future<Output = AulaResult<Campus>> + Send;
    fn get_by_id(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = AulaResult<Campus>> + Send;
    fn list_by_tenant(&self, tenant_id: Uuid)
    -> impl Future<Output = AulaResult<Vec<Campus>>> + Send;
}

// ---------------------------------------------------------------------------
// Users (tenant-scoped)
// ---------------------------------------------------------------------------

pub trait UserRepository: Send + Sync {
    fn create(&self, input: CreateUser) -> impl Future<Output = AulaResult<User>> + Send;
    fn get_by_id(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = AulaResult<User>> + Send;
    fn get_by_subject(
        &self,
        tenant_id: Uuid,
        subject: &str,
    ) -> impl Future<Output = AulaResult<User>> + Send;
    /// First-login upsert: an existing subject gets its `last_signed_in`
    /// touched; an unknown subject creates a fresh active user.
    fn upsert_by_subject(&self, input: CreateUser)
    -> impl Future<Output = AulaResult<User>> + Send;
    fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        input: UpdateUser,
    ) -> impl Future<Output = AulaResult<User>> + Send;
    fn list(
        &self,
        tenant_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = AulaResult<PaginatedResult<User>>> + Send;
}

// ---------------------------------------------------------------------------
// Roles & Permissions (tenant-scoped)
// ---------------------------------------------------------------------------

pub trait RoleRepository: Send + Sync {
    /// Create a role. Fails validation if `level` exceeds
    /// [`crate::models::role::MAX_ROLE_LEVEL`].
    fn create(&self, input: CreateRole) -> impl Future<Output = AulaResult<Role>> + Send;
    fn get_by_id(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = AulaResult<Role>> + Send;
    fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        input: UpdateRole,
    ) -> impl Future<Output = AulaResult<Role>> + Send;
    /// Delete a role and its assignment/grant edges. System roles refuse
    /// deletion.
    fn delete(&self, tenant_id: Uuid, id: Uuid) -> impl Future<Output = AulaResult<()>> + Send;
    fn list(
        &self,
        tenant_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = AulaResult<PaginatedResult<Role>>> + Send;

    /// Assign a role to a user, optionally scoped to a campus.
    fn assign_to_user(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
        role_id: Uuid,
        campus_id: Option<Uuid>,
    ) -> impl Future<Output = AulaResult<()>> + Send;

    /// Remove a role assignment from a user.
    fn unassign_from_user(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
        role_id: Uuid,
        campus_id: Option<Uuid>,
    ) -> impl Future<Output = AulaResult<()>> + Send;

    /// Get all roles assigned to a user within the tenant, across all
    /// campus scopes.
    fn get_user_roles(
        &self,
        tenant_id: Uuid,
        user_id: Uuid,
    ) -> impl Future<Output = AulaResult<Vec<Role>>> + Send;
}

pub trait PermissionRepository: Send + Sync {
    fn create(
        &self,
        input: CreatePermission,
    ) -> impl Future<Output = AulaResult<Permission>> + Send;
    fn get_by_id(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = AulaResult<Permission>> + Send;
    fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        input: UpdatePermission,
    ) -> impl Future<Output = AulaResult<Permission>> + Send;
    fn delete(&self, tenant_id: Uuid, id: Uuid) -> impl Future<Output = AulaResult<()>> + Send;
    fn list(
        &self,
        tenant_id: Uuid,
        pagination: Pagination,
    ) -> impl Future<Output = AulaResult<PaginatedResult<Permission>>> + Send;

    /// Grant a permission to a role (creates a `grants` edge).
    fn grant_to_role(
        &self,
        tenant_id: Uuid,
        role_id: Uuid,
        permission_id: Uuid,
    ) -> impl Future<Output = AulaResult<()>> + Send;

    /// Revoke a permission from a role.
    fn revoke_from_role(
        &self,
        tenant_id: Uuid,
        role_id: Uuid,
        permission_id: Uuid,
    ) -> impl Future<Output = AulaResult<()>> + Send;

    /// Get all permissions granted to a role.
    fn get_role_permissions(
        &self,
        tenant_id: Uuid,
        role_id: Uuid,
    ) -> impl Future<Output = AulaResult<Vec<Permission>>> + Send;
}

// ---------------------------------------------------------------------------
// Module catalog (global scope) & tenant installations
// ---------------------------------------------------------------------------

pub trait ModuleCatalogRepository: Send + Sync {
    /// Create a catalog entry. Fails if the slug is already taken.
    fn create(&self, input: CreateModule) -> impl Future<Output = AulaResult<Module>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = AulaResult<Module>> + Send;
    fn get_by_slug(&self, slug: &str) -> impl Future<Output = AulaResult<Module>> + Send;
    fn list_available(&self) -> impl Future<Output = AulaResult<Vec<Module>>> + Send;
    fn list_by_category(
        &self,
        category: ModuleCategory,
    ) -> impl Future<Output = AulaResult<Vec<Module>>> + Send;
    /// Full catalog, regardless of status. Used to build snapshots.
    fn list_all(&self) -> impl Future<Output = AulaResult<Vec<Module>>> + Send;
    /// Catalog entries are never deleted; retirement flips the status.
    fn set_status(
        &self,
        id: Uuid,
        status: ModuleStatus,
    ) -> impl Future<Output = AulaResult<Module>> + Send;
}

pub trait TenantModuleRepository: Send + Sync {
    /// Insert a fresh record with status `Installed` and the supplied
    /// configuration.
    fn insert(
        &self,
        tenant_id: Uuid,
        module_id: Uuid,
        config: serde_json::Value,
    ) -> impl Future<Output = AulaResult<TenantModule>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = AulaResult<TenantModule>> + Send;
    /// The active (non-uninstalled) record for (tenant, module), if any.
    fn find_active(
        &self,
        tenant_id: Uuid,
        module_id: Uuid,
    ) -> impl Future<Output = AulaResult<Option<TenantModule>>> + Send;
    /// Transition a record's status. Transitioning to `Uninstalled`
    /// stamps `uninstalled_at`.
    fn set_status(
        &self,
        id: Uuid,
        status: InstallStatus,
    ) -> impl Future<Output = AulaResult<TenantModule>> + Send;
    /// Unconditional replace of the configuration blob.
    fn update_config(
        &self,
        id: Uuid,
        config: serde_json::Value,
    ) -> impl Future<Output = AulaResult<TenantModule>> + Send;
    /// All records for a tenant, every status, for dependency scans and
    /// audit listings.
    fn list_by_tenant(
        &self,
        tenant_id: Uuid,
    ) -> impl Future<Output = AulaResult<Vec<TenantModule>>> + Send;
}
