//! Module installer error types.
//!
//! All variants are precondition failures surfaced verbatim to the admin
//! caller with the offending module slugs named, so the operator can
//! resolve the conflict (install the missing prerequisite, or uninstall
//! the blocking dependent first). None of them are retryable without a
//! state change.

use aula_core::error::AulaError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModuleError {
    #[error("module '{0}' is already installed")]
    AlreadyInstalled(String),

    #[error("module '{0}' is not installed")]
    NotInstalled(String),

    #[error("required modules not installed: {}", .0.join(", "))]
    MissingDependency(Vec<String>),

    #[error("installed modules depend on this module: {}", .0.join(", "))]
    DependentModulesExist(Vec<String>),

    #[error("module '{0}' is a core module and cannot be uninstalled")]
    CoreModuleProtected(String),

    #[error("invalid transition: module '{module}' is {status}")]
    InvalidTransition { module: String, status: String },
}

impl From<ModuleError> for AulaError {
    fn from(err: ModuleError) -> Self {
        match err {
            ModuleError::AlreadyInstalled(module) => AulaError::AlreadyInstalled { module },
            ModuleError::NotInstalled(module) => AulaError::NotInstalled { module },
            ModuleError::MissingDependency(missing) => AulaError::MissingDependency { missing },
            ModuleError::DependentModulesExist(blockers) => {
                AulaError::DependentModulesExist { blockers }
            }
            ModuleError::CoreModuleProtected(module) => AulaError::CoreModuleProtected { module },
            ModuleError::InvalidTransition { .. } => AulaError::Validation {
                message: err.to_string(),
            },
        }
    }
}
