//! Schema migrations using PRAGMA user_version.

pub mod v001_initial;
pub mod v002_rating_triggers;
pub mod v003_rating_update_trigger;

use rusqlite::Connection;
use shopvoice_core::errors::StorageError;

/// Latest schema version this crate knows how to build.
pub const LATEST_VERSION: u32 = 3;

/// Run all pending migrations. Each version commits together with its
/// `user_version` bump, so a failed migration leaves the previous version intact.
pub fn run_migrations(conn: &Connection) -> Result<(), StorageError> {
    let current = current_version(conn)?;

    let migrations: &[(&str, u32)] = &[
        (v001_initial::MIGRATION_SQL, 1),
        (v002_rating_triggers::MIGRATION_SQL, 2),
        (v003_rating_update_trigger::MIGRATION_SQL, 3),
    ];

    for (sql, version) in migrations {
        if current >= *version {
            continue;
        }
        let batch = format!("BEGIN;\n{sql}\nPRAGMA user_version = {version};\nCOMMIT;");
        if let Err(e) = conn.execute_batch(&batch) {
            // The failing statement may have left the transaction open.
            if !conn.is_autocommit() {
                let _ = conn.execute_batch("ROLLBACK");
            }
            return Err(StorageError::MigrationFailed {
                version: *version,
                message: e.to_string(),
            });
        }
        tracing::info!(version = version, "applied migration");
    }

    Ok(())
}

/// Get the current schema version.
pub fn current_version(conn: &Connection) -> Result<u32, StorageError> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })
}
