//! Pictag application binary - composition root.
//!
//! Ties together all Pictag crates into a single executable:
//! 1. Load configuration from TOML
//! 2. Prepare the blob store root and open SQLite
//! 3. Build the Gemini vision client and the ingest pipeline
//! 4. Start the axum HTTP server

use std::path::PathBuf;
use std::sync::Arc;

use pictag_api::routes;
use pictag_api::state::AppState;
use pictag_core::config::PictagConfig;
use pictag_ingest::IngestPipeline;
use pictag_storage::{BlobStore, Database, ImageRepository};
use pictag_vision::GeminiVisionService;

/// Resolve the config file path (PICTAG_CONFIG env, or ./pictag.toml).
fn config_path() -> PathBuf {
    if let Ok(p) = std::env::var("PICTAG_CONFIG") {
        return PathBuf::from(p);
    }
    PathBuf::from("pictag.toml")
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting Pictag v{}", env!("CARGO_PKG_VERSION"));

    // Config.
    let config_file = config_path();
    let config = PictagConfig::load_or_default(&config_file);

    if config.gemini.resolved_api_key().is_empty() {
        tracing::warn!(
            "No Gemini API key configured; set GEMINI_API_KEY or [gemini].api_key — analyses will fail"
        );
    }

    // Blob store: create the upload directory before accepting traffic.
    let blobs = Arc::new(BlobStore::new(&config.upload.dir));
    blobs.ensure_ready()?;

    // Metadata store.
    let db_path = PathBuf::from(&config.general.data_dir).join("pictag.db");
    let db = Database::new(&db_path)?;
    let images = ImageRepository::new(Arc::new(db));

    // Vision client + pipeline.
    let vision = GeminiVisionService::new(&config.gemini)?;
    let pipeline = IngestPipeline::new(Arc::clone(&blobs), images.clone(), vision);
    tracing::info!(model = %config.gemini.model, "Ingest pipeline ready");

    // HTTP server.
    let state = AppState::new(config, pipeline, blobs, images);
    routes::start_server(state).await?;

    Ok(())
}
