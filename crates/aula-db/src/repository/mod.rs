//! SurrealDB repository implementations.

mod campus;
mod module;
mod permission;
mod role;
mod tenant;
mod tenant_module;
mod user;

pub use campus::SurrealCampusRepository;
pub use module::SurrealModuleCatalogRepository;
pub use permission::SurrealPermissionRepository;
pub use role::SurrealRoleRepository;
pub use tenant::SurrealTenantRepository;
pub use tenant_module::SurrealTenantModuleRepository;
pub use user::SurrealUserRepository;
