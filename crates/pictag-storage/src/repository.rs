//! Repository for SQLite-backed image metadata persistence.
//!
//! Provides ImageRepository, operating on the Database struct with raw SQL.
//! The core contract is save and find_all; there is no update or delete.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use rusqlite::OptionalExtension;
use tracing::info;

use pictag_core::error::PictagError;
use pictag_core::types::{ImageRecord, NewImageRecord};

use crate::db::Database;

/// Repository for image metadata records.
#[derive(Clone)]
pub struct ImageRepository {
    db: Arc<Database>,
}

impl ImageRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Commit a new image record.
    ///
    /// The single INSERT is the pipeline's atomic commit: the row becomes
    /// visible with all fields set or not at all. The store assigns the id
    /// and the creation timestamp; both are returned on the committed record.
    pub fn save(&self, record: &NewImageRecord) -> Result<ImageRecord, PictagError> {
        self.db.with_conn(|conn| {
            let created_at = Utc::now();
            conn.execute(
                "INSERT INTO images (original_name, storage_name, storage_path, tags, description, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    record.original_name,
                    record.storage_name,
                    record.storage_path,
                    record.tags,
                    record.description,
                    created_at.timestamp(),
                ],
            )
            .map_err(|e| PictagError::Persist(format!("Failed to save image record: {}", e)))?;

            let id = conn.last_insert_rowid();
            info!(id, storage_name = %record.storage_name, "Image record committed");

            Ok(ImageRecord {
                id,
                original_name: record.original_name.clone(),
                storage_name: record.storage_name.clone(),
                storage_path: record.storage_path.clone(),
                tags: record.tags.clone(),
                description: record.description.clone(),
                // Truncated to whole seconds, matching what was persisted.
                created_at: Utc
                    .timestamp_opt(created_at.timestamp(), 0)
                    .single()
                    .unwrap_or(created_at),
            })
        })
    }

    /// Return all records in insertion (primary-key) order.
    pub fn find_all(&self) -> Result<Vec<ImageRecord>, PictagError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT id, original_name, storage_name, storage_path, tags, description, created_at
                     FROM images ORDER BY id ASC",
                )
                .map_err(|e| PictagError::Persist(e.to_string()))?;

            let rows = stmt
                .query_map([], row_to_image_record)
                .map_err(|e| PictagError::Persist(e.to_string()))?;

            let mut records = Vec::new();
            for row in rows {
                records.push(row.map_err(|e| PictagError::Persist(e.to_string()))?);
            }
            Ok(records)
        })
    }

    /// Find a record by its storage name.
    pub fn find_by_storage_name(
        &self,
        storage_name: &str,
    ) -> Result<Option<ImageRecord>, PictagError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT id, original_name, storage_name, storage_path, tags, description, created_at
                     FROM images WHERE storage_name = ?1",
                )
                .map_err(|e| PictagError::Persist(e.to_string()))?;

            stmt.query_row(rusqlite::params![storage_name], row_to_image_record)
                .optional()
                .map_err(|e| PictagError::Persist(e.to_string()))
        })
    }

    /// Count committed records.
    pub fn count(&self) -> Result<u64, PictagError> {
        self.db.with_conn(|conn| {
            let count: i64 = conn
                .query_row("SELECT COUNT(*) FROM images", [], |row| row.get(0))
                .map_err(|e| PictagError::Persist(e.to_string()))?;
            Ok(count as u64)
        })
    }
}

fn row_to_image_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<ImageRecord> {
    let created_at_secs: i64 = row.get(6)?;
    Ok(ImageRecord {
        id: row.get(0)?,
        original_name: row.get(1)?,
        storage_name: row.get(2)?,
        storage_path: row.get(3)?,
        tags: row.get(4)?,
        description: row.get(5)?,
        created_at: Utc
            .timestamp_opt(created_at_secs, 0)
            .single()
            .unwrap_or_else(Utc::now),
    })
}
