use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A committed image metadata record.
///
/// One row per successful ingest. The `id` is assigned by the metadata
/// store at commit time and never reused; `created_at` is set exactly once
/// from the server clock when the row is written.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Store-assigned identifier, immutable after commit.
    pub id: i64,
    /// User-supplied filename. Display only, never used as a path.
    pub original_name: String,
    /// Generated collision-free name the blob is stored under.
    pub storage_name: String,
    /// Absolute path of the stored blob at commit time.
    pub storage_path: String,
    /// Comma-delimited keywords from the tagging analysis.
    pub tags: Option<String>,
    /// Short prose description from the description analysis.
    pub description: Option<String>,
    /// Commit timestamp, server clock.
    pub created_at: DateTime<Utc>,
}

/// An image record as assembled by the pipeline, before the store assigns
/// its identifier and timestamp.
#[derive(Clone, Debug, PartialEq)]
pub struct NewImageRecord {
    pub original_name: String,
    pub storage_name: String,
    pub storage_path: String,
    pub tags: Option<String>,
    pub description: Option<String>,
}
