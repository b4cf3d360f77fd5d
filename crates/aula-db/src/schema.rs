//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Enums are stored as strings with
//! ASSERT constraints for validation.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Tenants (global scope)
-- =======================================================================
DEFINE TABLE tenant SCHEMAFULL;
DEFINE FIELD name ON TABLE tenant TYPE string;
DEFINE FIELD slug ON TABLE tenant TYPE string;
DEFINE FIELD subdomain ON TABLE tenant TYPE string;
DEFINE FIELD country ON TABLE tenant TYPE string;
DEFINE FIELD timezone ON TABLE tenant TYPE string;
DEFINE FIELD currency ON TABLE tenant TYPE string;
DEFINE FIELD status ON TABLE tenant TYPE string \
    ASSERT $value IN ['Active', 'Suspended', 'Archived'];
DEFINE FIELD tier ON TABLE tenant TYPE string \
    ASSERT $value IN ['Free', 'Starter', 'Professional', 'Enterprise'];
DEFINE FIELD max_users ON TABLE tenant TYPE int;
DEFINE FIELD max_students ON TABLE tenant TYPE int;
DEFINE FIELD created_at ON TABLE tenant TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE tenant TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_tenant_slug ON TABLE tenant COLUMNS slug UNIQUE;
DEFINE INDEX idx_tenant_subdomain ON TABLE tenant \
    COLUMNS subdomain UNIQUE;

-- =======================================================================
-- Campuses (tenant scope)
-- =======================================================================
DEFINE TABLE campus SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE campus TYPE string;
DEFINE FIELD name ON TABLE campus TYPE string;
DEFINE FIELD code ON TABLE campus TYPE string;
DEFINE FIELD location ON TABLE campus TYPE option<string>;
DEFINE FIELD created_at ON TABLE campus TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE campus TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_campus_tenant_code ON TABLE campus \
    COLUMNS tenant_id, code UNIQUE;

-- =======================================================================
-- Users (tenant scope)
-- =======================================================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE user TYPE string;
DEFINE FIELD subject ON TABLE user TYPE string;
DEFINE FIELD email ON TABLE user TYPE string;
DEFINE FIELD name ON TABLE user TYPE option<string>;
DEFINE FIELD status ON TABLE user TYPE string \
    ASSERT $value IN ['Active', 'Inactive', 'Suspended'];
DEFINE FIELD last_signed_in ON TABLE user TYPE option<datetime>;
DEFINE FIELD created_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_tenant_subject ON TABLE user \
    COLUMNS tenant_id, subject UNIQUE;
DEFINE INDEX idx_user_tenant_email ON TABLE user \
    COLUMNS tenant_id, email UNIQUE;

-- =======================================================================
-- Roles (tenant scope)
-- =======================================================================
DEFINE TABLE role SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE role TYPE string;
DEFINE FIELD name ON TABLE role TYPE string;
DEFINE FIELD level ON TABLE role TYPE int \
    ASSERT $value >= 0 AND $value <= 5;
DEFINE FIELD description ON TABLE role TYPE string;
DEFINE FIELD is_system ON TABLE role TYPE bool DEFAULT false;
DEFINE FIELD created_at ON TABLE role TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE role TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_role_tenant_name ON TABLE role \
    COLUMNS tenant_id, name UNIQUE;

-- =======================================================================
-- Permissions (tenant scope)
-- =======================================================================
DEFINE TABLE permission SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE permission TYPE string;
DEFINE FIELD name ON TABLE permission TYPE string;
DEFINE FIELD resource ON TABLE permission TYPE string;
DEFINE FIELD action ON TABLE permission TYPE string;
DEFINE FIELD description ON TABLE permission TYPE string;
DEFINE FIELD created_at ON TABLE permission TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE permission TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_permission_tenant_pair ON TABLE permission \
    COLUMNS tenant_id, resource, action UNIQUE;

-- =======================================================================
-- Module catalog (global scope)
-- =======================================================================
DEFINE TABLE module SCHEMAFULL;
DEFINE FIELD name ON TABLE module TYPE string;
DEFINE FIELD slug ON TABLE module TYPE string;
DEFINE FIELD version ON TABLE module TYPE string;
DEFINE FIELD category ON TABLE module TYPE string \
    ASSERT $value IN ['Core', 'Academic', 'Finance', 'Operations', \
    'Communication', 'Hr', 'Integration', 'Ai'];
DEFINE FIELD description ON TABLE module TYPE option<string>;
DEFINE FIELD is_core ON TABLE module TYPE bool DEFAULT false;
DEFINE FIELD status ON TABLE module TYPE string \
    ASSERT $value IN ['Available', 'Deprecated', 'Beta'];
DEFINE FIELD required_modules ON TABLE module TYPE array DEFAULT [];
DEFINE FIELD required_modules.* ON TABLE module TYPE string;
DEFINE FIELD created_at ON TABLE module TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE module TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_module_slug ON TABLE module COLUMNS slug UNIQUE;

-- =======================================================================
-- Tenant module installations (tenant scope, soft-state)
-- =======================================================================
DEFINE TABLE tenant_module SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE tenant_module TYPE string;
DEFINE FIELD module_id ON TABLE tenant_module TYPE string;
DEFINE FIELD status ON TABLE tenant_module TYPE string \
    ASSERT $value IN ['Installed', 'Disabled', 'Uninstalled'];
DEFINE FIELD config ON TABLE tenant_module TYPE object FLEXIBLE \
    DEFAULT {};
DEFINE FIELD installed_at ON TABLE tenant_module TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD uninstalled_at ON TABLE tenant_module \
    TYPE option<datetime>;
DEFINE FIELD created_at ON TABLE tenant_module TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE tenant_module TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_tenant_module_pair ON TABLE tenant_module \
    COLUMNS tenant_id, module_id;
DEFINE INDEX idx_tenant_module_status ON TABLE tenant_module \
    COLUMNS tenant_id, status;

-- =======================================================================
-- Graph Edge Tables (relations)
-- =======================================================================

-- User -> Role assignment (optionally scoped to a campus)
DEFINE TABLE has_role TYPE RELATION SCHEMAFULL;
DEFINE FIELD campus_id ON TABLE has_role TYPE option<string>;

-- Role -> Permission grants
DEFINE TABLE grants TYPE RELATION SCHEMAFULL;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
/// All DEFINE statements are idempotent so re-running is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}

/// Returns the raw schema DDL for version 1.
///
/// Exposed for testing with in-memory SurrealDB instances that
/// bypass the migration runner.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}
