//! SurrealDB implementation of [`ModuleCatalogRepository`].
//!
//! The catalog is global (not tenant-scoped). Entries are never deleted;
//! retirement is a status transition so installed tenants keep resolving
//! their metadata.

use aula_core::error::AulaResult;
use aula_core::models::module::{CreateModule, Module, ModuleCategory, ModuleStatus};
use aula_core::repository::ModuleCatalogRepository;
use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct ModuleRow {
    name: String,
    slug: String,
    version: String,
    category: String,
    description: Option<String>,
    is_core: bool,
    status: String,
    required_modules: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ModuleRow {
    fn into_module(self, id: Uuid) -> Result<Module, DbError> {
        Ok(Module {
            id,
            name: self.name,
            slug: self.slug,
            version: self.version,
            category: parse_category(&self.category)?,
            description: self.description,
            is_core: self.is_core,
            status: parse_status(&self.status)?,
            required_modules: parse_required(&self.required_modules)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct ModuleRowWithId {
    record_id: String,
    name: String,
    slug: String,
    version: String,
    category: String,
    description: Option<String>,
    is_core: bool,
    status: String,
    required_modules: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ModuleRowWithId {
    fn try_into_module(self) -> Result<Module, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        Ok(Module {
            id,
            name: self.name,
            slug: self.slug,
            version: self.version,
            category: parse_category(&self.category)?,
            description: self.description,
            is_core: self.is_core,
            status: parse_status(&self.status)?,
            required_modules: parse_required(&self.required_modules)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn parse_required(ids: &[String]) -> Result<Vec<Uuid>, DbError> {
    ids.iter()
        .map(|s| {
            Uuid::parse_str(s)
                .map_err(|e| DbError::Migration(format!("invalid required module UUID: {e}")))
        })
        .collect()
}

fn parse_category(s: &str) -> Result<ModuleCategory, DbError> {
    match s {
        "Core" => Ok(ModuleCategory::Core),
        "Academic" => Ok(ModuleCategory::Academic),
        "Finance" => Ok(ModuleCategory::Finance),
        "Operations" => Ok(ModuleCategory::Operations),
        "Communication" => Ok(ModuleCategory::Communication),
        "Hr" => Ok(ModuleCategory::Hr),
        "Integration" => Ok(ModuleCategory::Integration),
        "Ai" => Ok(ModuleCategory::Ai),
        other => Err(DbError::Migration(format!(
            "unknown module category: {other}"
        ))),
    }
}

fn category_to_string(c: &ModuleCategory) -> &'static str {
    match c {
        ModuleCategory::Core => "Core",
        ModuleCategory::Academic => "Academic",
        ModuleCategory::Finance => "Finance",
        ModuleCategory::Operations => "Operations",
        ModuleCategory::Communication => "Communication",
        ModuleCategory::Hr => "Hr",
        ModuleCategory::Integration => "Integration",
        ModuleCategory::Ai => "Ai",
    }
}

fn parse_status(s: &str) -> Result<ModuleStatus, DbError> {
    match s {
        "Available" => Ok(ModuleStatus::Available),
        "Deprecated" => Ok(ModuleStatus::Deprecated),
        "Beta" => Ok(ModuleStatus::Beta),
        other => Err(DbError::Migration(format!("unknown module status: {other}"))),
    }
}

fn status_to_string(s: &ModuleStatus) -> &'static str {
    match s {
        ModuleStatus::Available => "Available",
        ModuleStatus::Deprecated => "Deprecated",
        ModuleStatus::Beta => "Beta",
    }
}

/// SurrealDB implementation of the module catalog repository.
#[derive(Clone)]
pub struct SurrealModuleCatalogRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealModuleCatalogRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn select_where(&self, condition: &str, bind: Option<(&'static str, String)>) -> AulaResult<Vec<Module>> {
        let query = format!(
            "SELECT meta::id(id) AS record_id, * FROM module \
             {condition} ORDER BY slug ASC"
        );

        let mut builder = self.db.query(query);
        if let Some((key, value)) = bind {
            builder = builder.bind((key, value));
        }

        let mut result = builder.await.map_err(DbError::from)?;
        let rows: Vec<ModuleRowWithId> = result.take(0).map_err(DbError::from)?;

        let modules = rows
            .into_iter()
            .map(|row| row.try_into_module())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(modules)
    }
}

impl<C: Connection> ModuleCatalogRepository for SurrealModuleCatalogRepository<C> {
    async fn create(&self, input: CreateModule) -> AulaResult<Module> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let required: Vec<String> = input
            .required_modules
            .iter()
            .map(|m| m.to_string())
            .collect();

        let result = self
            .db
            .query(
                "CREATE type::record('module', $id) SET \
                 name = $name, slug = $slug, version = $version, \
                 category = $category, description = $description, \
                 is_core = $is_core, status = 'Available', \
                 required_modules = $required_modules",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("slug", input.slug))
            .bind(("version", input.version))
            .bind(("category", category_to_string(&input.category).to_string()))
            .bind(("description", input.description))
            .bind(("is_core", input.is_core))
            .bind(("required_modules", required))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<ModuleRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "module".into(),
            id: id_str,
        })?;

        Ok(row.into_module(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> AulaResult<Module> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('module', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ModuleRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "module".into(),
            id: id_str,
        })?;

        Ok(row.into_module(id)?)
    }

    async fn get_by_slug(&self, slug: &str) -> AulaResult<Module> {
        let slug_owned = slug.to_string();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM module \
                 WHERE slug = $slug",
            )
            .bind(("slug", slug_owned.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ModuleRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "module".into(),
            id: slug_owned,
        })?;

        Ok(row.try_into_module()?)
    }

    async fn list_available(&self) -> AulaResult<Vec<Module>> {
        self.select_where("WHERE status = 'Available'", None).await
    }

    async fn list_by_category(&self, category: ModuleCategory) -> AulaResult<Vec<Module>> {
        self.select_where(
            "WHERE status = 'Available' AND category = $category",
            Some(("category", category_to_string(&category).to_string())),
        )
        .await
    }

    async fn list_all(&self) -> AulaResult<Vec<Module>> {
        self.select_where("", None).await
    }

    async fn set_status(&self, id: Uuid, status: ModuleStatus) -> AulaResult<Module> {
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "UPDATE type::record('module', $id) SET \
                 status = $status, updated_at = time::now()",
            )
            .bind(("id", id_str.clone()))
            .bind(("status", status_to_string(&status).to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<ModuleRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "module".into(),
            id: id_str,
        })?;

        Ok(row.into_module(id)?)
    }
}
