//! Collision-free storage-name generation.
//!
//! Untrusted original filenames never touch the filesystem; each upload is
//! stored under `{uuid}.{ext}` where only the extension survives from the
//! original name.

use uuid::Uuid;

/// Derive a storage name from an untrusted original filename.
///
/// The extension is the substring after the last `.`, lower-cased for
/// determinism. A name with no `.` (or ending in `.`) yields the bare
/// uuid with no trailing dot.
pub fn storage_name_for(original_name: &str) -> String {
    let uuid = Uuid::new_v4();
    match extract_ext(original_name) {
        Some(ext) => format!("{}.{}", uuid, ext),
        None => uuid.to_string(),
    }
}

/// The lower-cased extension of `name`, if it has a non-empty one.
pub fn extract_ext(name: &str) -> Option<String> {
    let ext = name.rsplit_once('.').map(|(_, ext)| ext)?;
    if ext.is_empty() {
        None
    } else {
        Some(ext.to_ascii_lowercase())
    }
}
