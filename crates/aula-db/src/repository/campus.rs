//! SurrealDB implementation of [`CampusRepository`].

use aula_core::error::AulaResult;
use aula_core::models::campus::{Campus, CreateCampus};
use aula_core::repository::CampusRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct CampusRow {
    tenant_id: String,
    name: String,
    code: String,
    location: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CampusRow {
    fn into_campus(self, id: Uuid) -> Result<Campus, DbError> {
        let tenant_id = Uuid::parse_str(&self.tenant_id)
            .map_err(|e| DbError::Migration(format!("invalid tenant UUID: {e}")))?;
        Ok(Campus {
            id,
            tenant_id,
            name: self.name,
            code: self.code,
            location: self.location,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct CampusRowWithId {
    record_id: String,
    tenant_id: String,
    name: String,
    code: String,
    location: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CampusRowWithId {
    fn try_into_campus(self) -> Result<Campus, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        let tenant_id = Uuid::parse_str(&self.tenant_id)
            .map_err(|e| DbError::Migration(format!("invalid tenant UUID: {e}")))?;
        Ok(Campus {
            id,
            tenant_id,
            name: self.name,
            code: self.code,
            location: self.location,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Campus repository.
#[derive(Clone)]
pub struct SurrealCampusRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealCampusRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> CampusRepository for SurrealCampusRepository<C> {
    async fn create(&self, input: CreateCampus) -> AulaResult<Campus> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('campus', $id) SET \
                 tenant_id = $tenant_id, \
                 name = $name, code = $code, location = $location",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", input.tenant_id.to_string()))
            .bind(("name", input.name))
            .bind(("code", input.code))
            .bind(("location", input.location))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<CampusRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "campus".into(),
            id: id_str,
        })?;

        Ok(row.into_campus(id)?)
    }

    async fn get_by_id(&self, tenant_id: Uuid, id: Uuid) -> AulaResult<Campus> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT * FROM type::record('campus', $id) \
                 WHERE tenant_id = $tenant_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CampusRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "campus".into(),
            id: id_str,
        })?;

        Ok(row.into_campus(id)?)
    }

    async fn list_by_tenant(&self, tenant_id: Uuid) -> AulaResult<Vec<Campus>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM campus \
                 WHERE tenant_id = $tenant_id \
                 ORDER BY created_at ASC",
            )
            .bind(("tenant_id", tenant_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CampusRowWithId> = result.take(0).map_err(DbError::from)?;

        let campuses = rows
            .into_iter()
            .map(|row| row.try_into_campus())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(campuses)
    }
}
