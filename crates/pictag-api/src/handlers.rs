//! Route handler functions for all API endpoints.
//!
//! The upload handler always answers with a redirect back to the listing,
//! carrying a success or error indicator in the query string. The listing
//! and health endpoints return JSON; blob serving returns raw bytes.

use axum::extract::{Multipart, Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Redirect};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use pictag_ingest::UploadedImage;
use pictag_storage::filename::extract_ext;
use pictag_storage::BlobStore;
use pictag_vision::VisionService;

use crate::error::ApiError;
use crate::state::AppState;

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ImageResponse {
    pub id: i64,
    pub original_name: String,
    pub storage_name: String,
    /// Serving URL for the stored blob.
    pub url: String,
    pub tags: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListingResponse {
    pub images: Vec<ImageResponse>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub total_images: u64,
}

// =============================================================================
// Handler functions
// =============================================================================

/// POST /upload - run one upload through the ingest pipeline.
///
/// Every outcome is a redirect to `/`: success carries a `success` query
/// indicator, failure an `error` indicator with the message.
pub async fn upload<V: VisionService + 'static>(
    State(state): State<AppState<V>>,
    mut multipart: Multipart,
) -> Redirect {
    let upload = match read_file_field(&mut multipart).await {
        Ok(upload) => upload,
        Err(message) => {
            warn!(message, "Upload rejected before ingest");
            return redirect_error(&message);
        }
    };

    match state.pipeline.ingest(upload).await {
        Ok(record) => {
            info!(id = record.id, storage_name = %record.storage_name, "Upload ingested");
            redirect_success("Image uploaded successfully")
        }
        Err(e) => {
            warn!(error = %e, "Upload failed");
            redirect_error(&e.to_string())
        }
    }
}

/// GET / - all records via the metadata store, in insertion order.
pub async fn list<V: VisionService + 'static>(
    State(state): State<AppState<V>>,
) -> Result<Json<ListingResponse>, ApiError> {
    let images = state
        .images
        .find_all()?
        .into_iter()
        .map(|r| ImageResponse {
            url: format!("/images/{}", r.storage_name),
            id: r.id,
            original_name: r.original_name,
            storage_name: r.storage_name,
            tags: r.tags,
            description: r.description,
            created_at: r.created_at,
        })
        .collect();

    Ok(Json(ListingResponse { images }))
}

/// GET /images/{storage_name} - raw blob bytes.
///
/// 400 for names that are not a well-formed single path segment (traversal
/// attempts included), 404 when no blob is stored under the name.
pub async fn serve_image<V: VisionService + 'static>(
    State(state): State<AppState<V>>,
    Path(storage_name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    if !BlobStore::valid_name(&storage_name) {
        return Err(ApiError::BadRequest(format!(
            "Invalid image name: {:?}",
            storage_name
        )));
    }

    if !state.blobs.exists(&storage_name) {
        return Err(ApiError::NotFound(format!(
            "No image stored under {}",
            storage_name
        )));
    }

    let bytes = state.blobs.read(&storage_name)?;
    let content_type = content_type_for(&storage_name);
    Ok(([(header::CONTENT_TYPE, content_type)], bytes))
}

/// GET /health - service health and record count.
pub async fn health<V: VisionService + 'static>(
    State(state): State<AppState<V>>,
) -> Result<Json<HealthResponse>, ApiError> {
    let total_images = state.images.count()?;
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        total_images,
    }))
}

// =============================================================================
// Helpers
// =============================================================================

/// Read the single `file` field out of the multipart form.
///
/// The field's declared content type is used when present; otherwise the
/// MIME type is inferred from the original name's extension.
async fn read_file_field(multipart: &mut Multipart) -> Result<UploadedImage, String> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Malformed upload form: {}", e))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let original_name = field.file_name().unwrap_or_default().to_string();
        let declared_type = field.content_type().map(|c| c.to_string());
        let bytes = field
            .bytes()
            .await
            .map_err(|e| format!("Failed to read upload: {}", e))?
            .to_vec();

        let mime_type =
            declared_type.unwrap_or_else(|| content_type_for(&original_name).to_string());

        return Ok(UploadedImage {
            original_name,
            mime_type,
            bytes,
        });
    }

    Err("No file field in upload form".to_string())
}

fn redirect_success(message: &str) -> Redirect {
    Redirect::to(&format!("/?success={}", encode(message)))
}

fn redirect_error(message: &str) -> Redirect {
    Redirect::to(&format!("/?error={}", encode(message)))
}

fn encode(s: &str) -> String {
    url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
}

/// Content type for a stored name, from its extension.
fn content_type_for(name: &str) -> &'static str {
    match extract_ext(name).as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
