//! Pictag core crate - configuration, error taxonomy, domain types.
//!
//! Shared foundation for the ingest pipeline: the `PictagConfig` loaded at
//! startup, the `PictagError` enum that tags every failure with the stage
//! that produced it, and the `ImageRecord` domain entity.

pub mod config;
pub mod error;
pub mod types;

pub use config::PictagConfig;
pub use error::{PictagError, Result};
pub use types::{ImageRecord, NewImageRecord};
