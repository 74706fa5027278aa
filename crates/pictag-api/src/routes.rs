//! Router setup with all API routes and middleware.
//!
//! Configures the axum Router with request tracing and the configured
//! upload body limit.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use pictag_vision::VisionService;

use crate::handlers;
use crate::state::AppState;

/// Create the axum Router with all routes and middleware.
pub fn create_router<V: VisionService + 'static>(state: AppState<V>) -> Router {
    let max_body = state.config.upload.max_size_mb as usize * 1024 * 1024;

    Router::new()
        .route("/", get(handlers::list::<V>))
        .route("/upload", post(handlers::upload::<V>))
        .route("/images/{storage_name}", get(handlers::serve_image::<V>))
        .route("/health", get(handlers::health::<V>))
        .layer(DefaultBodyLimit::max(max_body))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server on the configured address.
///
/// Binds to 127.0.0.1 (localhost only) on the port from config.
pub async fn start_server<V: VisionService + 'static>(
    state: AppState<V>,
) -> Result<(), pictag_core::error::PictagError> {
    let addr = format!("127.0.0.1:{}", state.config.general.port);

    let router = create_router(state);

    tracing::info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| pictag_core::error::PictagError::Api(format!("Failed to bind: {}", e)))?;

    axum::serve(listener, router)
        .await
        .map_err(|e| pictag_core::error::PictagError::Api(format!("Server error: {}", e)))?;

    Ok(())
}
