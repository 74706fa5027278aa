//! Pictag API crate - axum HTTP server and route handlers.
//!
//! Provides the HTTP surface of the application: the upload form endpoint,
//! the listing query, raw blob serving, and a health check.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
