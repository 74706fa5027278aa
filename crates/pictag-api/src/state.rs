//! Application state shared across all route handlers.
//!
//! AppState holds references to the configuration, the ingest pipeline,
//! and the stores. It is passed to handlers via axum's State extractor and
//! is generic over the vision service so tests can inject the mock.

use std::sync::Arc;
use std::time::Instant;

use pictag_core::config::PictagConfig;
use pictag_ingest::IngestPipeline;
use pictag_storage::{BlobStore, ImageRepository};
use pictag_vision::VisionService;

/// Shared application state.
///
/// All fields use `Arc` (or are cheap clones) so the state clones freely
/// across handler tasks.
pub struct AppState<V: VisionService> {
    /// Application configuration.
    pub config: Arc<PictagConfig>,
    /// The ingest-analyze-persist pipeline.
    pub pipeline: Arc<IngestPipeline<V>>,
    /// Filesystem blob store for serving stored images.
    pub blobs: Arc<BlobStore>,
    /// Metadata repository for the listing query.
    pub images: ImageRepository,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl<V: VisionService> AppState<V> {
    /// Create a new AppState with the given components.
    pub fn new(
        config: PictagConfig,
        pipeline: IngestPipeline<V>,
        blobs: Arc<BlobStore>,
        images: ImageRepository,
    ) -> Self {
        Self {
            config: Arc::new(config),
            pipeline: Arc::new(pipeline),
            blobs,
            images,
            start_time: Instant::now(),
        }
    }
}

// Manual Clone: `V` itself need not be Clone, only the Arcs are cloned.
impl<V: VisionService> Clone for AppState<V> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            pipeline: Arc::clone(&self.pipeline),
            blobs: Arc::clone(&self.blobs),
            images: self.images.clone(),
            start_time: self.start_time,
        }
    }
}
