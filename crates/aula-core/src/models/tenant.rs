//! Tenant domain model.
//!
//! A tenant is an isolated customer organization (a school). All domain
//! entities except the module catalog are scoped to a tenant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TenantStatus {
    Active,
    Suspended,
    Archived,
}

/// Subscription tier, used for seat caps and billing outside this core.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TenantTier {
    Free,
    Starter,
    Professional,
    Enterprise,
}

/// An isolated customer organization.
///
/// `slug` and `subdomain` are globally unique across all tenants — the
/// subdomain is how request routing resolves the tenant context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub id: Uuid,
    pub name: String,
    /// URL-safe unique identifier (e.g. `greenfield-academy`).
    pub slug: String,
    /// Unique subdomain the tenant is served under.
    pub subdomain: String,
    pub country: String,
    pub timezone: String,
    pub currency: String,
    pub status: TenantStatus,
    pub tier: TenantTier,
    pub max_users: u32,
    pub max_students: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a new tenant.
///
/// Locale fields default to the platform's home market when omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTenant {
    pub name: String,
    pub slug: String,
    pub subdomain: String,
    pub country: Option<String>,
    pub timezone: Option<String>,
    pub currency: Option<String>,
}

/// Fields that can be updated on an existing tenant.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateTenant {
    pub name: Option<String>,
    pub status: Option<TenantStatus>,
    pub tier: Option<TenantTier>,
    pub max_users: Option<u32>,
    pub max_students: Option<u32>,
}
