//! Pictag ingest crate - the ingest-analyze-persist pipeline.
//!
//! Sequences one upload through storage-name generation, the blob write,
//! two vision analyses, and the atomic metadata commit.

pub mod pipeline;

pub use pipeline::{IngestPipeline, UploadedImage};
