//! Integration tests for the Pictag API.
//!
//! Exercises all four routes end to end against an in-memory metadata
//! store, a temp-dir blob store, and the mock vision service. Each test is
//! independent with its own state.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use pictag_api::create_router;
use pictag_api::handlers::{HealthResponse, ListingResponse};
use pictag_api::state::AppState;
use pictag_core::config::PictagConfig;
use pictag_ingest::IngestPipeline;
use pictag_storage::{BlobStore, Database, ImageRepository};
use pictag_vision::MockVisionService;

// =============================================================================
// Helpers
// =============================================================================

const BOUNDARY: &str = "pictag-test-boundary";

/// Handles to the state behind a router, for asserting on side effects.
struct Fixture {
    _dir: tempfile::TempDir,
    blobs: Arc<BlobStore>,
    images: ImageRepository,
}

/// Create a fresh router backed by the given vision service.
fn make_app_with(vision: MockVisionService) -> (axum::Router, Fixture) {
    let dir = tempfile::tempdir().unwrap();
    let blobs = Arc::new(BlobStore::new(dir.path().join("uploads")));
    blobs.ensure_ready().unwrap();
    let images = ImageRepository::new(Arc::new(Database::in_memory().unwrap()));
    let pipeline = IngestPipeline::new(Arc::clone(&blobs), images.clone(), vision);
    let state = AppState::new(
        PictagConfig::default(),
        pipeline,
        Arc::clone(&blobs),
        images.clone(),
    );
    (
        create_router(state),
        Fixture {
            _dir: dir,
            blobs,
            images,
        },
    )
}

fn make_app() -> (axum::Router, Fixture) {
    make_app_with(MockVisionService::new())
}

/// Build a multipart POST /upload request with a single file field.
fn upload_request(filename: Option<&str>, content_type: &str, bytes: &[u8]) -> Request<Body> {
    let disposition = match filename {
        Some(name) => format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            name
        ),
        None => "Content-Disposition: form-data; name=\"file\"\r\n".to_string(),
    };

    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(disposition.as_bytes());
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::post("/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

async fn body_bytes(resp: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .unwrap()
        .to_vec()
}

fn location(resp: &axum::response::Response) -> String {
    resp.headers()
        .get("location")
        .expect("redirect must carry a Location header")
        .to_str()
        .unwrap()
        .to_string()
}

// =============================================================================
// Health and listing
// =============================================================================

#[tokio::test]
async fn test_health() {
    let (app, _fixture) = make_app();
    let resp = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let health: HealthResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(health.status, "ok");
    assert_eq!(health.total_images, 0);
}

#[tokio::test]
async fn test_listing_starts_empty() {
    let (app, _fixture) = make_app();
    let resp = app.oneshot(get("/")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let listing: ListingResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert!(listing.images.is_empty());
}

// =============================================================================
// Upload
// =============================================================================

#[tokio::test]
async fn test_upload_success_redirects_and_commits() {
    let (app, fixture) = make_app();

    let resp = app
        .clone()
        .oneshot(upload_request(
            Some("cat.jpg"),
            "image/jpeg",
            b"\xFF\xD8\xFFfake-jpeg",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert!(location(&resp).starts_with("/?success="));

    let resp = app.oneshot(get("/")).await.unwrap();
    let listing: ListingResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(listing.images.len(), 1);

    let image = &listing.images[0];
    assert_eq!(image.original_name, "cat.jpg");
    assert_eq!(image.tags.as_deref(), Some("cat, sofa, warm light"));
    assert!(image.storage_name.ends_with(".jpg"));
    assert_eq!(image.url, format!("/images/{}", image.storage_name));
    assert!(fixture.blobs.exists(&image.storage_name));
}

#[tokio::test]
async fn test_uploaded_blob_is_served_back() {
    let (app, _fixture) = make_app();
    let payload = b"\xFF\xD8\xFFjpeg-payload";

    let resp = app
        .clone()
        .oneshot(upload_request(Some("photo.jpg"), "image/jpeg", payload))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let resp = app.clone().oneshot(get("/")).await.unwrap();
    let listing: ListingResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    let url = listing.images[0].url.clone();

    let resp = app.oneshot(get(&url)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "image/jpeg"
    );
    assert_eq!(body_bytes(resp).await, payload);
}

#[tokio::test]
async fn test_upload_empty_file_redirects_with_error() {
    let (app, fixture) = make_app();

    let resp = app
        .oneshot(upload_request(Some("empty.png"), "image/png", b""))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/?error=Uploaded+file+is+empty");
    assert_eq!(fixture.images.count().unwrap(), 0);
}

#[tokio::test]
async fn test_upload_without_filename_redirects_with_error() {
    let (app, fixture) = make_app();

    let resp = app
        .oneshot(upload_request(None, "image/png", b"some-bytes"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert!(location(&resp).starts_with("/?error="));
    assert_eq!(fixture.images.count().unwrap(), 0);
}

#[tokio::test]
async fn test_upload_without_file_field_redirects_with_error() {
    let (app, _fixture) = make_app();

    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(b"Content-Disposition: form-data; name=\"other\"\r\n\r\nvalue\r\n");
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    let req = Request::post("/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap();

    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert!(location(&resp).starts_with("/?error="));
}

#[tokio::test]
async fn test_upload_backend_failure_leaves_no_record() {
    let (app, fixture) = make_app_with(MockVisionService::failing());

    let resp = app
        .oneshot(upload_request(Some("doomed.png"), "image/png", b"bytes"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert!(location(&resp).starts_with("/?error="));
    assert_eq!(fixture.images.count().unwrap(), 0);
    // The blob written before the analysis failure stays behind, orphaned.
    assert_eq!(
        std::fs::read_dir(fixture.blobs.root()).unwrap().count(),
        1
    );
}

#[tokio::test]
async fn test_upload_empty_candidates_redirects_with_error() {
    let (app, fixture) = make_app_with(MockVisionService::empty());

    let resp = app
        .oneshot(upload_request(Some("photo.png"), "image/png", b"bytes"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&resp),
        "/?error=AI+backend+returned+no+candidates"
    );
    assert_eq!(fixture.images.count().unwrap(), 0);
}

#[tokio::test]
async fn test_two_uploads_both_listed() {
    let (app, _fixture) = make_app();

    for name in ["one.png", "two.png"] {
        let resp = app
            .clone()
            .oneshot(upload_request(Some(name), "image/png", b"pixels"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    }

    let resp = app.clone().oneshot(get("/")).await.unwrap();
    let listing: ListingResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(listing.images.len(), 2);
    assert_ne!(
        listing.images[0].storage_name,
        listing.images[1].storage_name
    );

    // Each record independently resolves to its own blob.
    for image in &listing.images {
        let resp = app.clone().oneshot(get(&image.url)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}

// =============================================================================
// Blob serving
// =============================================================================

#[tokio::test]
async fn test_serve_missing_image_is_not_found() {
    let (app, _fixture) = make_app();
    let resp = app.oneshot(get("/images/unknown.png")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_serve_rejects_path_traversal() {
    let (app, fixture) = make_app();

    // Plant a file outside the blob root to prove it stays unreachable.
    let secret = fixture.blobs.root().parent().unwrap().join("secret.txt");
    std::fs::write(&secret, b"do not serve").unwrap();

    let resp = app
        .clone()
        .oneshot(get("/images/..%2Fsecret.txt"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = app
        .oneshot(get("/images/..%2F..%2Fetc%2Fpasswd"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_serve_unknown_extension_uses_octet_stream() {
    let (app, fixture) = make_app();
    fixture.blobs.store(b"raw", "blob.bin").unwrap();

    let resp = app.oneshot(get("/images/blob.bin")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "application/octet-stream"
    );
}

#[tokio::test]
async fn test_health_counts_committed_records() {
    let (app, _fixture) = make_app();

    let resp = app
        .clone()
        .oneshot(upload_request(Some("a.png"), "image/png", b"bytes"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let resp = app.oneshot(get("/health")).await.unwrap();
    let health: HealthResponse = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(health.total_images, 1);
}
