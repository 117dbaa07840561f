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
-- Users
-- =======================================================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD email ON TABLE user TYPE string;
DEFINE FIELD role ON TABLE user TYPE string \
    ASSERT $value IN ['professional', 'facility'];
DEFINE FIELD assignments ON TABLE user TYPE array DEFAULT [];
DEFINE FIELD assignments.* ON TABLE user TYPE object FLEXIBLE;
DEFINE FIELD has_professional_profile ON TABLE user TYPE bool DEFAULT false;
DEFINE FIELD has_facility_profile ON TABLE user TYPE bool DEFAULT false;
DEFINE FIELD onboarding_professional_completed ON TABLE user TYPE bool \
    DEFAULT false;
DEFINE FIELD onboarding_facility_completed ON TABLE user TYPE bool \
    DEFAULT false;
DEFINE FIELD onboarding_completed ON TABLE user TYPE bool DEFAULT false;
DEFINE FIELD metadata ON TABLE user TYPE object FLEXIBLE DEFAULT {};
DEFINE FIELD created_at ON TABLE user TYPE datetime DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE user TYPE datetime DEFAULT time::now();

-- =======================================================================
-- Profile extensions (one table per kind, keyed by user id)
-- =======================================================================
DEFINE TABLE professional_profile SCHEMAFULL;
DEFINE FIELD display_name ON TABLE professional_profile TYPE string;
DEFINE FIELD contact_email ON TABLE professional_profile \
    TYPE option<string>;
DEFINE FIELD contact_phone ON TABLE professional_profile \
    TYPE option<string>;
DEFINE FIELD visibility ON TABLE professional_profile TYPE string \
    ASSERT $value IN ['public', 'private'];
DEFINE FIELD completion_percent ON TABLE professional_profile TYPE int \
    DEFAULT 0;
DEFINE FIELD metadata ON TABLE professional_profile TYPE object FLEXIBLE \
    DEFAULT {};
DEFINE FIELD updated_at ON TABLE professional_profile TYPE datetime \
    DEFAULT time::now();

DEFINE TABLE facility_profile SCHEMAFULL;
DEFINE FIELD display_name ON TABLE facility_profile TYPE string;
DEFINE FIELD contact_email ON TABLE facility_profile TYPE option<string>;
DEFINE FIELD contact_phone ON TABLE facility_profile TYPE option<string>;
DEFINE FIELD visibility ON TABLE facility_profile TYPE string \
    ASSERT $value IN ['public', 'private'];
DEFINE FIELD completion_percent ON TABLE facility_profile TYPE int \
    DEFAULT 0;
DEFINE FIELD metadata ON TABLE facility_profile TYPE object FLEXIBLE \
    DEFAULT {};
DEFINE FIELD updated_at ON TABLE facility_profile TYPE datetime \
    DEFAULT time::now();

-- =======================================================================
-- Admin extensions (keyed by user id)
-- =======================================================================
DEFINE TABLE admin SCHEMAFULL;
DEFINE FIELD is_active ON TABLE admin TYPE bool DEFAULT true;
DEFINE FIELD roles ON TABLE admin TYPE array<string> DEFAULT [];
DEFINE FIELD rights ON TABLE admin TYPE array<string> DEFAULT [];
DEFINE FIELD granted_at ON TABLE admin TYPE datetime DEFAULT time::now();

-- =======================================================================
-- Facilities
-- =======================================================================
DEFINE TABLE facility SCHEMAFULL;
DEFINE FIELD name ON TABLE facility TYPE string;
DEFINE FIELD employees ON TABLE facility TYPE array DEFAULT [];
DEFINE FIELD employees.* ON TABLE facility TYPE object FLEXIBLE;
DEFINE FIELD admins ON TABLE facility TYPE array<string> DEFAULT [];
DEFINE FIELD created_at ON TABLE facility TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE facility TYPE datetime \
    DEFAULT time::now();
";

/// The v1 schema DDL, exposed for tooling.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}

/// Apply all pending migrations.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    db.query(MIGRATION_TABLE_DDL).await?.check()
        .map_err(|e| DbError::Migration(format!("migration table: {e}")))?;

    let mut result = db
        .query("SELECT version, name FROM _migration ORDER BY version")
        .await?;
    let applied: Vec<MigrationRecord> = result.take(0)?;
    let current = applied.iter().map(|m| m.version).max().unwrap_or(0);

    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        info!(version = migration.version, name = migration.name, "applying migration");
        db.query(migration.sql)
            .await?
            .check()
            .map_err(|e| DbError::Migration(format!("{}: {e}", migration.name)))?;
        db.query("CREATE _migration SET version = $version, name = $name")
            .bind(("version", migration.version))
            .bind(("name", migration.name.to_string()))
            .await?
            .check()
            .map_err(|e| DbError::Migration(format!("record {}: {e}", migration.name)))?;
    }

    Ok(())
}
