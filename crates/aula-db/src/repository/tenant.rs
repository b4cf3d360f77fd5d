//! SurrealDB implementation of [`TenantRepository`].

use aula_core::error::AulaResult;
use aula_core::models::tenant::{CreateTenant, Tenant, TenantStatus, TenantTier, UpdateTenant};
use aula_core::repository::{PaginatedResult, Pagination, TenantRepository};
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct TenantRow {
    name: String,
    slug: String,
    subdomain: String,
    country: String,
    timezone: String,
    currency: String,
    status: String,
    tier: String,
    max_users: u32,
    max_students: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TenantRow {
    fn into_tenant(self, id: Uuid) -> Result<Tenant, DbError> {
        Ok(Tenant {
            id,
            name: self.name,
            slug: self.slug,
            subdomain: self.subdomain,
            country: self.country,
            timezone: self.timezone,
            currency: self.currency,
            status: parse_status(&self.status)?,
            tier: parse_tier(&self.tier)?,
            max_users: self.max_users,
            max_students: self.max_students,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct TenantRowWithId {
    record_id: String,
    name: String,
    slug: String,
    subdomain: String,
    country: String,
    timezone: String,
    currency: String,
    status: String,
    tier: String,
    max_users: u32,
    max_students: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TenantRowWithId {
    fn try_into_tenant(self) -> Result<Tenant, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        Ok(Tenant {
            id,
            name: self.name,
            slug: self.slug,
            subdomain: self.subdomain,
            country: self.country,
            timezone: self.timezone,
            currency: self.currency,
            status: parse_status(&self.status)?,
            tier: parse_tier(&self.tier)?,
            max_users: self.max_users,
            max_students: self.max_students,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

fn parse_status(s: &str) -> Result<TenantStatus, DbError> {
    match s {
        "Active" => Ok(TenantStatus::Active),
        "Suspended" => Ok(TenantStatus::Suspended),
        "Archived" => Ok(TenantStatus::Archived),
        other => Err(DbError::Migration(format!("unknown tenant status: {other}"))),
    }
}

fn status_to_string(s: &TenantStatus) -> &'static str {
    match s {
        TenantStatus::Active => "Active",
        TenantStatus::Suspended => "Suspended",
        TenantStatus::Archived => "Archived",
    }
}

fn parse_tier(s: &str) -> Result<TenantTier, DbError> {
    match s {
        "Free" => Ok(TenantTier::Free),
        "Starter" => Ok(TenantTier::Starter),
        "Professional" => Ok(TenantTier::Professional),
        "Enterprise" => Ok(TenantTier::Enterprise),
        other => Err(DbError::Migration(format!("unknown tenant tier: {other}"))),
    }
}

fn tier_to_string(t: &TenantTier) -> &'static str {
    match t {
        TenantTier::Free => "Free",
        TenantTier::Starter => "Starter",
        TenantTier::Professional => "Professional",
        TenantTier::Enterprise => "Enterprise",
    }
}

/// SurrealDB implementation of the Tenant repository.
#[derive(Clone)]
pub struct SurrealTenantRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealTenantRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn get_by_field(&self, field: &'static str, value: String) -> AulaResult<Tenant> {
        let query = format!(
            "SELECT meta::id(id) AS record_id, * FROM tenant \
             WHERE {field} = $value"
        );

        let mut result = self
            .db
            .query(query)
            .bind(("value", value.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TenantRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "tenant".into(),
            id: value,
        })?;

        Ok(row.try_into_tenant()?)
    }
}

impl<C: Connection> TenantRepository for SurrealTenantRepository<C> {
    async fn create(&self, input: CreateTenant) -> AulaResult<Tenant> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        // New tenants start active on the starter tier with default
        // seat caps; locale fields default to the home market.
        let result = self
            .db
            .query(
                "CREATE type::record('tenant', $id) SET \
                 name = $name, slug = $slug, subdomain = $subdomain, \
                 country = $country, timezone = $timezone, \
                 currency = $currency, \
                 status = 'Active', tier = 'Starter', \
                 max_users = 100, max_students = 1000",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("slug", input.slug))
            .bind(("subdomain", input.subdomain))
            .bind(("country", input.country.unwrap_or_else(|| "KE".into())))
            .bind((
                "timezone",
                input.timezone.unwrap_or_else(|| "Africa/Nairobi".into()),
            ))
            .bind(("currency", input.currency.unwrap_or_else(|| "KES".into())))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<TenantRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "tenant".into(),
            id: id_str,
        })?;

        Ok(row.into_tenant(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> AulaResult<Tenant> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('tenant', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TenantRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "tenant".into(),
            id: id_str,
        })?;

        Ok(row.into_tenant(id)?)
    }

    async fn get_by_slug(&self, slug: &str) -> AulaResult<Tenant> {
        self.get_by_field("slug", slug.to_string()).await
    }

    async fn get_by_subdomain(&self, subdomain: &str) -> AulaResult<Tenant> {
        self.get_by_field("subdomain", subdomain.to_string()).await
    }

    async fn update(&self, id: Uuid, input: UpdateTenant) -> AulaResult<Tenant> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.status.is_some() {
            sets.push("status = $status");
        }
        if input.tier.is_some() {
            sets.push("tier = $tier");
        }
        if input.max_users.is_some() {
            sets.push("max_users = $max_users");
        }
        if input.max_students.is_some() {
            sets.push("max_students = $max_students");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('tenant', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(ref status) = input.status {
            builder = builder.bind(("status", status_to_string(status).to_string()));
        }
        if let Some(ref tier) = input.tier {
            builder = builder.bind(("tier", tier_to_string(tier).to_string()));
        }
        if let Some(max_users) = input.max_users {
            builder = builder.bind(("max_users", max_users));
        }
        if let Some(max_students) = input.max_students {
            builder = builder.bind(("max_students", max_students));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<TenantRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "tenant".into(),
            id: id_str,
        })?;

        Ok(row.into_tenant(id)?)
    }

    async fn list(&self, pagination: Pagination) -> AulaResult<PaginatedResult<Tenant>> {
        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM tenant GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM tenant \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TenantRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_tenant())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
