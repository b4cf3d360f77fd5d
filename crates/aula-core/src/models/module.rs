//! Module catalog domain model.
//!
//! Catalog entries are tenant-agnostic and created by platform operators.
//! They are never deleted — retirement is a status change to `Deprecated`
//! so existing installations keep resolving.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ModuleCategory {
    Core,
    Academic,
    Finance,
    Operations,
    Communication,
    Hr,
    Integration,
    Ai,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ModuleStatus {
    Available,
    Deprecated,
    Beta,
}

/// An optional feature unit installable per tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    pub id: Uuid,
    pub name: String,
    /// Globally unique, URL-safe identifier (e.g. `gradebook`).
    pub slug: String,
    pub version: String,
    pub category: ModuleCategory,
    pub description: Option<String>,
    /// Core modules can never be uninstalled.
    pub is_core: bool,
    pub status: ModuleStatus,
    /// Direct prerequisites that must be installed first.
    pub required_modules: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateModule {
    pub name: String,
    pub slug: String,
    pub version: String,
    pub category: ModuleCategory,
    pub description: Option<String>,
    pub is_core: bool,
    pub required_modules: Vec<Uuid>,
}
