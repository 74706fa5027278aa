//! Pictag storage crate - SQLite metadata persistence and the blob store.
//!
//! Provides a WAL-mode SQLite database with migrations, the image metadata
//! repository, the filesystem blob store uploaded bytes are written to, and
//! the collision-free storage-name generator.

pub mod blob;
pub mod db;
pub mod filename;
pub mod migrations;
pub mod repository;

pub use blob::BlobStore;
pub use db::Database;
pub use filename::storage_name_for;
pub use repository::ImageRepository;
