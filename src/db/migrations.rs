//! Database migration runner.

use rusqlite::Connection;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::forms::FormKind;

use super::DbPool;

/// Embedded migration files.
const MIGRATIONS: &[(&str, &str)] = &[(
    "001_initial_schema",
    include_str!("migrations/001_initial_schema.sql"),
)];

/// Column block shared by every per-form table.
const FORM_TABLE_COLUMNS: &str = "
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    policy_title TEXT,
    review_date TEXT,
    upload_date TEXT,
    reviewed_by TEXT,
    review_status TEXT DEFAULT 'review',
    comments TEXT,
    user_id TEXT,
    uploaded_by TEXT,
    submission_time TEXT,
    modified_on TEXT,
    modified_by TEXT,
    file_name TEXT,
    file_id TEXT UNIQUE
";

/// Run all pending migrations, then bring the per-form tables up to date
/// with the form registry.
///
/// Migrations are run in order and tracked in the `schema_migrations` table.
pub fn run_migrations(pool: &DbPool) -> AppResult<()> {
    let conn = pool.connection();

    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL
        )",
        [],
    )
    .map_err(|e| AppError::Database(format!("Failed to create schema_migrations: {}", e)))?;

    let current_version = get_current_version(&conn)?;
    info!("Current schema version: {}", current_version);

    // Find pending migrations
    let pending: Vec<usize> = MIGRATIONS
        .iter()
        .enumerate()
        .filter(|(i, _)| (*i as i64 + 1) > current_version)
        .map(|(i, _)| i)
        .collect();

    if pending.is_empty() {
        info!("No pending migrations");
    } else {
        info!("{} migration(s) pending", pending.len());

        for i in pending {
            let (name, sql) = MIGRATIONS[i];
            let version = i as i64 + 1;
            info!("Applying migration {}: {}", version, name);

            conn.execute_batch(sql)
                .map_err(|e| AppError::Database(format!("Migration {} failed: {}", name, e)))?;

            conn.execute(
                "INSERT INTO schema_migrations (version, name, applied_at) VALUES (?1, ?2, ?3)",
                rusqlite::params![version, name, chrono::Utc::now().to_rfc3339()],
            )
            .map_err(|e| AppError::Database(format!("Failed to record migration: {}", e)))?;

            info!("Migration {} applied successfully", name);
        }
    }

    ensure_form_tables(&conn)
}

/// Create the table for every registered form kind.
///
/// The DDL is generated from the registry so a form added there gets its
/// table on the next startup; nothing else defines the per-form schema.
pub fn ensure_form_tables(conn: &Connection) -> AppResult<()> {
    for kind in FormKind::all() {
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            kind.table(),
            FORM_TABLE_COLUMNS
        );
        conn.execute(&sql, []).map_err(|e| {
            AppError::Database(format!("Failed to create table {}: {}", kind.table(), e))
        })?;
    }
    Ok(())
}

/// Get the current schema version from the database.
fn get_current_version(conn: &Connection) -> AppResult<i64> {
    let result = conn.query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
        row.get::<_, Option<i64>>(0)
    });

    match result {
        Ok(version) => Ok(version.unwrap_or(0)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(e) => Err(AppError::Database(e.to_string())),
    }
}
