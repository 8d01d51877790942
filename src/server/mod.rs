//! HTTP server layer for picture uploads.
//!
//! Embeds the [`UploadService`](crate::picture::UploadService) behind an Axum
//! router. The server is the caller of the pipeline, so it owns request
//! concerns the core leaves out: identifier and width checks, body size
//! limits, CORS and request tracing.

pub mod handlers;
pub mod routes;

pub use handlers::{
    health_handler, upload_handler, validate_identifier, validate_width, AppState, ErrorResponse,
    HealthResponse, UploadQueryParams, UploadResponse,
};
pub use routes::{
    create_router, RouterConfig, DEFAULT_LOCATION, DEFAULT_MAX_UPLOAD_SIZE, DEFAULT_MAX_WIDTH,
    DEFAULT_WIDTH,
};
