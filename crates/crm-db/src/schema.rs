//! Schema definitions and migration runner for SurrealDB.
//!
//! All tables are SCHEMAFULL. UUIDs are the record keys and are stored
//! as strings in reference fields. Enums are stored as strings with
//! ASSERT constraints.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::{debug, info};

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
// Schema v1
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Accounts (identity provider, global scope)
-- =======================================================================
DEFINE TABLE account SCHEMAFULL;
DEFINE FIELD email ON TABLE account TYPE string;
DEFINE FIELD password_hash ON TABLE account TYPE string;
DEFINE FIELD created_at ON TABLE account TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_account_email ON TABLE account COLUMNS email UNIQUE;

-- =======================================================================
-- Clients (tenancy root)
-- =======================================================================
DEFINE TABLE client SCHEMAFULL;
DEFINE FIELD user_id ON TABLE client TYPE string;
DEFINE FIELD name ON TABLE client TYPE string;
DEFINE FIELD email ON TABLE client TYPE string;
DEFINE FIELD phone ON TABLE client TYPE string;
DEFINE FIELD company ON TABLE client TYPE option<string>;
DEFINE FIELD notes ON TABLE client TYPE option<string>;
DEFINE FIELD created_at ON TABLE client TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_client_user ON TABLE client COLUMNS user_id;

-- =======================================================================
-- Projects (tenant derived through client_id)
-- =======================================================================
DEFINE TABLE project SCHEMAFULL;
DEFINE FIELD client_id ON TABLE project TYPE string;
DEFINE FIELD title ON TABLE project TYPE string;
DEFINE FIELD description ON TABLE project TYPE option<string>;
DEFINE FIELD budget ON TABLE project TYPE float ASSERT $value >= 0;
DEFINE FIELD deadline ON TABLE project TYPE datetime;
DEFINE FIELD status ON TABLE project TYPE string \
    ASSERT $value IN ['planned', 'in_progress', 'completed', 'cancelled'];
DEFINE FIELD created_at ON TABLE project TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_project_client ON TABLE project COLUMNS client_id;

-- =======================================================================
-- Interaction logs (tenant derived through client_id or project_id)
-- =======================================================================
DEFINE TABLE interaction_log SCHEMAFULL;
DEFINE FIELD client_id ON TABLE interaction_log TYPE option<string>;
DEFINE FIELD project_id ON TABLE interaction_log TYPE option<string>;
DEFINE FIELD date ON TABLE interaction_log TYPE datetime;
DEFINE FIELD kind ON TABLE interaction_log TYPE string \
    ASSERT $value IN ['call', 'email', 'meeting'];
DEFINE FIELD notes ON TABLE interaction_log TYPE option<string>;
DEFINE FIELD created_at ON TABLE interaction_log TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_log_client ON TABLE interaction_log COLUMNS client_id;
DEFINE INDEX idx_log_project ON TABLE interaction_log COLUMNS project_id;

-- =======================================================================
-- Reminders (tenant stamped directly)
-- =======================================================================
DEFINE TABLE reminder SCHEMAFULL;
DEFINE FIELD user_id ON TABLE reminder TYPE string;
DEFINE FIELD client_id ON TABLE reminder TYPE option<string>;
DEFINE FIELD project_id ON TABLE reminder TYPE option<string>;
DEFINE FIELD note ON TABLE reminder TYPE string;
DEFINE FIELD due_date ON TABLE reminder TYPE datetime;
DEFINE FIELD created_at ON TABLE reminder TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_reminder_user_due ON TABLE reminder \
    COLUMNS user_id, due_date;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Bring the CRM schema up to the newest version.
///
/// Versions already recorded in `_migration` are skipped, so calling
/// this on every start is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(format!("cannot define _migration: {e}")))?;

    let mut result = db
        .query("SELECT version FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let recorded: Vec<MigrationRecord> = result.take(0)?;
    let schema_version = recorded.first().map(|m| m.version).unwrap_or(0);

    let pending: Vec<&Migration> = MIGRATIONS
        .iter()
        .filter(|m| m.version > schema_version)
        .collect();
    if pending.is_empty() {
        debug!(schema_version, "CRM schema is current");
        return Ok(());
    }

    for migration in pending {
        db.query(migration.sql).await?.check().map_err(|e| {
            DbError::Migration(format!(
                "schema v{} ({}) rejected: {e}",
                migration.version, migration.name,
            ))
        })?;

        db.query("CREATE _migration SET version = $version, name = $name")
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "schema v{} applied but not recorded: {e}",
                    migration.version,
                ))
            })?;

        info!(
            from = schema_version,
            to = migration.version,
            name = migration.name,
            "CRM schema upgraded"
        );
    }

    Ok(())
}
