//! SurrealDB implementation of [`RoleRepository`].

use aula_core::error::{AulaError, AulaResult};
use aula_core::models::role::{CreateRole, MAX_ROLE_LEVEL, Role, UpdateRole};
use aula_core::repository::{PaginatedResult, Pagination, RoleRepository};
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct RoleRow {
    tenant_id: String,
    name: String,
    level: u8,
    description: String,
    is_system: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RoleRow {
    fn into_role(self, id: Uuid) -> Result<Role, DbError> {
        let tenant_id = Uuid::parse_str(&self.tenant_id)
            .map_err(|e| DbError::Migration(format!("invalid tenant UUID: {e}")))?;
        Ok(Role {
            id,
            tenant_id,
            name: self.name,
            level: self.level,
            description: self.description,
            is_system: self.is_system,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct RoleRowWithId {
    record_id: String,
    tenant_id: String,
    name: String,
    level: u8,
    description: String,
    is_system: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RoleRowWithId {
    fn try_into_role(self) -> Result<Role, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        let tenant_id = Uuid::parse_str(&self.tenant_id)
            .map_err(|e| DbError::Migration(format!("invalid tenant UUID: {e}")))?;
        Ok(Role {
            id,
            tenant_id,
            name: self.name,
            level: self.level,
            description: self.description,
            is_system: self.is_system,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

fn check_level(level: u8) -> AulaResult<()> {
    if level > MAX_ROLE_LEVEL {
        return Err(AulaError::Validation {
            message: format!("role level must be 0..={MAX_ROLE_LEVEL}, got {level}"),
        });
    }
    Ok(())
}

/// SurrealDB implementation of the Role repository.
#[derive(Clone)]
pub struct SurrealRoleRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealRoleRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> RoleRepository for SurrealRoleRepository<C> {
    async fn create(&self, input: CreateRole) -> AulaResult<Role> {
        check_level(input.level)?;

        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('role', $id) SET \
                 tenant_id = $tenant_id, \
                 name = $name, level = $level, \
                 description = $description, \
                 is_system = $is_system",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", input.tenant_id.to_string()))
            .bind(("name", input.name))
            .bind(("level", input.level))
            .bind(("description", input.description))
            .bind(("is_system", input.is_system))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<RoleRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "role".into(),
            id: id_str,
        })?;

        Ok(row.into_role(id)?)
    }

    async fn get_by_id(&self, tenant_id: Uuid, id: Uuid) -> AulaResult<Role> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT * FROM type::record('role', $id) \
                 WHERE tenant_id = $tenant_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RoleRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "role".into(),
            id: id_str,
        })?;

        Ok(row.into_role(id)?)
    }

    async fn update(&self, tenant_id: Uuid, id: Uuid, input: UpdateRole) -> AulaResult<Role> {
        if let Some(level) = input.level {
            check_level(level)?;
        }

        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.level.is_some() {
            sets.push("level = $level");
        }
        if input.description.is_some() {
            sets.push("description = $description");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('role', $id) SET {} \
             WHERE tenant_id = $tenant_id",
            sets.join(", ")
        );

        let mut builder = self
            .db
            .query(&query)
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", tenant_id.to_string()));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(level) = input.level {
            builder = builder.bind(("level", level));
        }
        if let Some(description) = input.description {
            builder = builder.bind(("description", description));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<RoleRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "role".into(),
            id: id_str,
        })?;

        Ok(row.into_role(id)?)
    }

    async fn delete(&self, tenant_id: Uuid, id: Uuid) -> AulaResult<()> {
        // System-defined roles refuse deletion.
        let role = self.get_by_id(tenant_id, id).await?;
        if role.is_system {
            return Err(AulaError::Validation {
                message: format!("role '{}' is system-defined and cannot be deleted", role.name),
            });
        }

        let id_str = id.to_string();

        // Delete associated edges first, then the role record.
        let query = format!(
            "DELETE has_role WHERE out = role:`{id_str}`; \
             DELETE grants WHERE in = role:`{id_str}`; \
             DELETE type::record('role', $id) WHERE tenant_id = $tenant_id;"
        );

        self.db
            .query(query)
            .bind(("id", id_str))
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(
        &self,
        tenant_id: Uuid,
        pagination: Pagination,
    ) -> AulaResult<PaginatedResult<Role>> {
        let tenant_id_str = tenant_id.to_string();

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM role \
                 WHERE tenant_id = $tenant_id GROUP ALL",
            )
            .bind(("tenant_id", tenant_id_str.clone()))
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM role \
                 WHERE tenant_id = $tenant_id \
                 ORDER BY level ASC, created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("tenant_id", tenant_id_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RoleRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_role())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn assign_to_user(
        &self,
        _tenant_id: Uuid,
        user_id: Uuid,
        role_id: Uuid,
        campus_id: Option<Uuid>,
    ) -> AulaResult<()> {
        let user_id_str = user_id.to_string();
        let role_id_str = role_id.to_string();
        let campus_id_str = campus_id.map(|c| c.to_string());

        let query = format!(
            "RELATE user:`{user_id_str}` -> has_role -> role:`{role_id_str}` \
             SET campus_id = $campus_id;"
        );

        self.db
            .query(query)
            .bind(("campus_id", campus_id_str))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn unassign_from_user(
        &self,
        _tenant_id: Uuid,
        user_id: Uuid,
        role_id: Uuid,
        campus_id: Option<Uuid>,
    ) -> AulaResult<()> {
        let campus_id_str = campus_id.map(|c| c.to_string());

        // Match on campus_id: None means tenant-wide, Some means scoped.
        let query = if campus_id_str.is_some() {
            "DELETE has_role WHERE \
             in = type::record('user', $user_id) AND \
             out = type::record('role', $role_id) AND \
             campus_id = $campus_id"
        } else {
            "DELETE has_role WHERE \
             in = type::record('user', $user_id) AND \
             out = type::record('role', $role_id) AND \
             campus_id = NONE"
        };

        self.db
            .query(query)
            .bind(("user_id", user_id.to_string()))
            .bind(("role_id", role_id.to_string()))
            .bind(("campus_id", campus_id_str))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn get_user_roles(&self, tenant_id: Uuid, user_id: Uuid) -> AulaResult<Vec<Role>> {
        let tenant_id_str = tenant_id.to_string();
        let user_id_str = user_id.to_string();

        // The tenant filter on the role table is what guarantees
        // cross-tenant isolation: an edge pointing at another tenant's
        // role resolves to nothing here.
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM role \
                 WHERE tenant_id = $tenant_id \
                 AND id IN (\
                     SELECT VALUE out FROM has_role \
                     WHERE in = type::record('user', $user_id)\
                 )",
            )
            .bind(("tenant_id", tenant_id_str))
            .bind(("user_id", user_id_str))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RoleRowWithId> = result.take(0).map_err(DbError::from)?;

        // A user may hold the same role on several campuses; collapse to
        // distinct roles.
        let mut seen = std::collections::HashSet::new();
        let mut roles = Vec::new();
        for row in rows {
            if seen.insert(row.record_id.clone()) {
                roles.push(row.try_into_role()?);
            }
        }

        Ok(roles)
    }
}
