//! The ingest pipeline.
//!
//! One invocation per upload, run to completion or first failure:
//!
//! 1. Validate the payload (empty bytes, missing name) before any side effect.
//! 2. Generate the storage name and write the blob.
//! 3. Run the two vision analyses concurrently and join both results.
//! 4. Commit the metadata record as a single atomic write.
//!
//! A failure after the blob write leaves the blob orphaned on disk; the
//! orphan is logged at WARN and never referenced by any record.

use std::sync::Arc;

use tracing::{info, warn};

use pictag_core::error::PictagError;
use pictag_core::types::{ImageRecord, NewImageRecord};
use pictag_storage::{storage_name_for, BlobStore, ImageRepository};
use pictag_vision::{PromptKind, VisionService};

/// One submitted upload: raw bytes plus the untrusted original name and
/// declared MIME type.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub original_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// The ingest-analyze-persist pipeline.
///
/// Concurrent ingests are independent; the only shared resources are the
/// blob root and the metadata store, both safe for concurrent writers.
pub struct IngestPipeline<V: VisionService> {
    blobs: Arc<BlobStore>,
    images: ImageRepository,
    vision: V,
}

impl<V: VisionService> IngestPipeline<V> {
    pub fn new(blobs: Arc<BlobStore>, images: ImageRepository, vision: V) -> Self {
        Self {
            blobs,
            images,
            vision,
        }
    }

    /// Run one upload through the full pipeline.
    ///
    /// Returns the committed record including its assigned identifier. Every
    /// failure carries the variant of the stage that produced it and aborts
    /// the remaining steps; nothing is retried here.
    pub async fn ingest(&self, upload: UploadedImage) -> Result<ImageRecord, PictagError> {
        if upload.bytes.is_empty() {
            return Err(PictagError::EmptyFile);
        }
        if upload.original_name.trim().is_empty() {
            return Err(PictagError::MissingName);
        }

        let storage_name = storage_name_for(&upload.original_name);
        let storage_path = self.blobs.store(&upload.bytes, &storage_name)?;

        // The two analyses are independent reads of the same immutable
        // bytes; dispatch them together and join before the commit.
        let (tags, description) = tokio::join!(
            self.vision
                .analyze(&upload.bytes, &upload.mime_type, PromptKind::Tags),
            self.vision
                .analyze(&upload.bytes, &upload.mime_type, PromptKind::Description),
        );

        let tags = match tags {
            Ok(t) => t,
            Err(e) => return Err(self.orphaned(&storage_name, e)),
        };
        let description = match description {
            Ok(d) => d,
            Err(e) => return Err(self.orphaned(&storage_name, e)),
        };

        let record = NewImageRecord {
            original_name: upload.original_name,
            storage_name: storage_name.clone(),
            storage_path: storage_path.display().to_string(),
            tags: Some(tags),
            description: Some(description),
        };

        match self.images.save(&record) {
            Ok(committed) => {
                info!(
                    id = committed.id,
                    storage_name = %committed.storage_name,
                    "Ingest complete"
                );
                Ok(committed)
            }
            Err(e) => Err(self.orphaned(&storage_name, e)),
        }
    }

    /// Record that a written blob is now unreferenced, then pass the error on.
    fn orphaned(&self, storage_name: &str, err: PictagError) -> PictagError {
        warn!(
            storage_name,
            root = %self.blobs.root().display(),
            error = %err,
            "Ingest failed after blob write; blob left orphaned"
        );
        err
    }
}
