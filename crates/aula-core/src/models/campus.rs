//! Campus domain model.
//!
//! A campus is a sub-tenant unit (one physical school site). Role
//! assignments may optionally be scoped to a campus.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campus {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    /// Short code, unique within the tenant (e.g. `MAIN`, `NORTH`).
    pub code: String,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCampus {
    pub tenant_id: Uuid,
    pub name: String,
    pub code: String,
    pub location: Option<String>,
}
