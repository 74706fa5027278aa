//! Filesystem blob store for uploaded image bytes.
//!
//! Blobs are written under a single root directory, keyed by their
//! generated storage name. Storage names double as URL path segments, so
//! any name containing a path separator or parent-directory component is
//! rejected before the filesystem is touched.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use pictag_core::error::PictagError;

/// Filesystem-backed blob store rooted at a configured directory.
#[derive(Debug, Clone)]
pub struct BlobStore {
    root: PathBuf,
}

impl BlobStore {
    /// Create a store rooted at `root`. No filesystem access happens here;
    /// call [`ensure_ready`](Self::ensure_ready) once before the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory blobs are stored under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the root directory, including intermediate segments.
    ///
    /// Idempotent and safe to call on every startup. Failure is surfaced
    /// to the caller rather than logged and swallowed.
    pub fn ensure_ready(&self) -> Result<(), PictagError> {
        std::fs::create_dir_all(&self.root)
            .map_err(|e| PictagError::Store(format!("Failed to create blob root: {}", e)))?;
        info!(root = %self.root.display(), "Blob store ready");
        Ok(())
    }

    /// Write `bytes` under `storage_name` and return the absolute path.
    pub fn store(&self, bytes: &[u8], storage_name: &str) -> Result<PathBuf, PictagError> {
        let path = self.resolve(storage_name)?;
        std::fs::write(&path, bytes)
            .map_err(|e| PictagError::Store(format!("Failed to write blob: {}", e)))?;
        debug!(path = %path.display(), size = bytes.len(), "Blob written");
        Ok(path)
    }

    /// Read the blob stored under `storage_name`.
    ///
    /// A missing blob surfaces as the underlying NotFound I/O error inside
    /// the Store variant; callers that need to distinguish it can check
    /// [`exists`](Self::exists) first.
    pub fn read(&self, storage_name: &str) -> Result<Vec<u8>, PictagError> {
        let path = self.resolve(storage_name)?;
        std::fs::read(&path)
            .map_err(|e| PictagError::Store(format!("Failed to read blob: {}", e)))
    }

    /// Whether a blob exists under `storage_name`.
    ///
    /// Malformed names are reported as absent rather than an error.
    pub fn exists(&self, storage_name: &str) -> bool {
        self.resolve(storage_name)
            .map(|p| p.is_file())
            .unwrap_or(false)
    }

    /// Whether `name` is acceptable as a storage name: non-empty, a single
    /// path segment, no parent-directory component. The same names appear
    /// in serving URLs, so this check is the traversal guard for both the
    /// write and the read path.
    pub fn valid_name(name: &str) -> bool {
        !name.is_empty() && name != ".." && !name.contains('/') && !name.contains('\\')
    }

    /// Resolve a storage name to an absolute path under the root.
    fn resolve(&self, storage_name: &str) -> Result<PathBuf, PictagError> {
        if !Self::valid_name(storage_name) {
            return Err(PictagError::Store(format!(
                "Invalid storage name: {:?}",
                storage_name
            )));
        }

        let path = self.root.join(storage_name);
        if path.is_absolute() {
            Ok(path)
        } else {
            // Relative roots are resolved against the current directory so
            // the stored path stays valid after a cwd change.
            let cwd = std::env::current_dir()
                .map_err(|e| PictagError::Store(format!("Cannot resolve blob root: {}", e)))?;
            Ok(cwd.join(path))
        }
    }
}
