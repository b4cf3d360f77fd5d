//! Role domain model.
//!
//! Roles are ranked 0 (highest authority) through 5 (lowest). The level
//! is informational — it orders roles in admin UIs but is never consulted
//! by the permission evaluator. Granting a level-0 role access to an
//! action still requires an explicit permission grant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Highest value a role level may take (levels run 0..=5).
pub const MAX_ROLE_LEVEL: u8 = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    /// Hierarchy level, 0 (highest) to 5 (lowest).
    pub level: u8,
    pub description: String,
    /// System-defined roles refuse deletion.
    pub is_system: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRole {
    pub tenant_id: Uuid,
    pub name: String,
    pub level: u8,
    pub description: String,
    pub is_system: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateRole {
    pub name: Option<String>,
    pub level: Option<u8>,
    pub description: Option<String>,
}
