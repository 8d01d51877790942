//! Router configuration for the picture upload server.
//!
//! # Route Structure
//!
//! ```text
//! /health                    - Health check
//! /pictures/{identifier}     - Picture upload (POST, multipart)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use picture_upload::server::routes::{create_router, RouterConfig};
//! use picture_upload::{ImageStore, UploadService};
//!
//! let service = UploadService::new(ImageStore::current_dir());
//! let config = RouterConfig::new("/images/")
//!     .with_default_width(200)
//!     .with_cors_origins(vec!["https://example.com".to_string()]);
//!
//! let router = create_router(service, config);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use http::header::CONTENT_TYPE;
use http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{health_handler, upload_handler, AppState};
use crate::picture::UploadService;

/// Default destination directory for stored pictures.
pub const DEFAULT_LOCATION: &str = "/images/";

/// Default output width in pixels.
pub const DEFAULT_WIDTH: u32 = 300;

/// Default upper bound on the width a request may ask for.
pub const DEFAULT_MAX_WIDTH: u32 = 4096;

/// Default maximum request body size (10 MiB).
pub const DEFAULT_MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024;

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Destination directory, relative to the store root
    pub location: String,

    /// Output width when the request gives none
    pub default_width: u32,

    /// Largest width a request may ask for
    pub max_width: u32,

    /// Maximum accepted request body size in bytes
    pub max_upload_size: usize,

    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl RouterConfig {
    /// Create a router configuration storing pictures under `location`.
    ///
    /// By default:
    /// - Width is 300 pixels, requests may ask for up to 4096
    /// - Uploads up to 10 MiB are accepted
    /// - CORS allows any origin
    /// - Tracing is enabled
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            default_width: DEFAULT_WIDTH,
            max_width: DEFAULT_MAX_WIDTH,
            max_upload_size: DEFAULT_MAX_UPLOAD_SIZE,
            cors_origins: None,
            enable_tracing: true,
        }
    }

    /// Set the output width used when a request gives none.
    pub fn with_default_width(mut self, width: u32) -> Self {
        self.default_width = width;
        self
    }

    /// Set the largest width a request may ask for.
    pub fn with_max_width(mut self, width: u32) -> Self {
        self.max_width = width;
        self
    }

    /// Set the maximum request body size in bytes.
    pub fn with_max_upload_size(mut self, bytes: usize) -> Self {
        self.max_upload_size = bytes;
        self
    }

    /// Set specific allowed CORS origins.
    ///
    /// Pass an empty vec to disallow all cross-origin requests.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Allow any CORS origin.
    pub fn with_cors_any_origin(mut self) -> Self {
        self.cors_origins = None;
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::new(DEFAULT_LOCATION)
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
///
/// This function builds the complete Axum router with:
/// - Health check and upload routes
/// - Request body limit
/// - CORS configuration
/// - Request tracing (optional)
pub fn create_router(upload_service: UploadService, config: RouterConfig) -> Router {
    let app_state = AppState::new(
        upload_service,
        config.location.clone(),
        config.default_width,
        config.max_width,
    );

    let cors = build_cors_layer(&config);

    let router = Router::new()
        .route("/health", get(health_handler))
        .route("/pictures/{identifier}", post(upload_handler))
        .with_state(app_state)
        .layer(DefaultBodyLimit::max(config.max_upload_size))
        .layer(cors);

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(86400)); // 24 hours

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) if origins.is_empty() => cors,
        Some(origins) => {
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
