//! Error types for the AULA system.
//!
//! Authorization denial is NOT represented here — `authorize` returns a
//! plain `false`. Only the explicit `require` helper converts a deny into
//! [`AulaError::AccessDenied`], so callers can never conflate "not
//! permitted" with "system broken".

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AulaError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Entity already exists: {entity}")]
    AlreadyExists { entity: String },

    #[error("Module already installed: {module}")]
    AlreadyInstalled { module: String },

    #[error("Module not installed: {module}")]
    NotInstalled { module: String },

    #[error("Missing required modules: {}", missing.join(", "))]
    MissingDependency { missing: Vec<String> },

    #[error("Installed modules depend on this module: {}", blockers.join(", "))]
    DependentModulesExist { blockers: Vec<String> },

    #[error("Core module cannot be uninstalled: {module}")]
    CoreModuleProtected { module: String },

    #[error("Access denied: {action} on {resource}")]
    AccessDenied { resource: String, action: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Tenant context missing or invalid")]
    TenantContext,
}

pub type AulaResult<T> = Result<T, AulaError>;
