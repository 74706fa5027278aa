//! Database schema migrations.
//!
//! Applies the initial schema: the images table and the schema_migrations
//! tracking table.

use rusqlite::Connection;
use tracing::info;

use pictag_core::error::PictagError;

/// Run all pending database migrations.
///
/// Currently implements the initial schema (version 1). Future migrations
/// can be added by checking the current version and applying incremental changes.
pub fn run_migrations(conn: &Connection) -> Result<(), PictagError> {
    // Create the migrations tracking table first.
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version     INTEGER PRIMARY KEY NOT NULL,
            name        TEXT NOT NULL,
            applied_at  INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        );",
    )
    .map_err(|e| PictagError::Persist(format!("Failed to create migrations table: {}", e)))?;

    let current_version: i64 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .map_err(|e| PictagError::Persist(format!("Failed to query migration version: {}", e)))?;

    if current_version < 1 {
        apply_v1(conn)?;
        info!("Applied migration v1: initial_schema");
    }

    Ok(())
}

/// Version 1: Initial schema.
///
/// `storage_name` is UNIQUE so a generated name can never be attached to
/// two records, even across deletes of the underlying blob. Rows are
/// immutable after insert; `id` follows rowid order, which gives
/// `find_all` its stable total ordering.
fn apply_v1(conn: &Connection) -> Result<(), PictagError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS images (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            original_name   TEXT NOT NULL,
            storage_name    TEXT NOT NULL UNIQUE,
            storage_path    TEXT NOT NULL,
            tags            TEXT,
            description     TEXT,
            created_at      INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_images_storage_name
            ON images (storage_name);

        INSERT INTO schema_migrations (version, name) VALUES (1, 'initial_schema');
        ",
    )
    .map_err(|e| PictagError::Persist(format!("Failed to apply migration v1: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        let version: i64 = conn
            .query_row(
                "SELECT MAX(version) FROM schema_migrations",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(version, 1);
    }

    #[test]
    fn test_storage_name_is_unique() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        conn.execute(
            "INSERT INTO images (original_name, storage_name, storage_path, created_at)
             VALUES ('a.png', 'dupe.png', '/tmp/dupe.png', 0)",
            [],
        )
        .unwrap();

        let second = conn.execute(
            "INSERT INTO images (original_name, storage_name, storage_path, created_at)
             VALUES ('b.png', 'dupe.png', '/tmp/dupe.png', 0)",
            [],
        );
        assert!(second.is_err());
    }
}
