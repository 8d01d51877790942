//! HTTP request handlers for the picture upload API.
//!
//! # Endpoints
//!
//! - `POST /pictures/{identifier}` - Upload a picture (multipart field `get_picture`)
//! - `GET /health` - Health check endpoint

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::error::UploadError;
use crate::picture::{UploadOutcome, UploadParams, UploadService};

// =============================================================================
// Application State
// =============================================================================

/// Shared application state containing the upload service.
///
/// This is passed to all handlers via Axum's State extractor.
#[derive(Clone)]
pub struct AppState {
    /// The service running the picture pipeline
    pub upload_service: Arc<UploadService>,

    /// Destination directory for stored pictures (e.g. `/images/`)
    pub location: String,

    /// Width used when the request does not give one
    pub default_width: u32,

    /// Largest width a request may ask for
    pub max_width: u32,
}

impl AppState {
    /// Create a new application state.
    pub fn new(
        upload_service: UploadService,
        location: impl Into<String>,
        default_width: u32,
        max_width: u32,
    ) -> Self {
        Self {
            upload_service: Arc::new(upload_service),
            location: location.into(),
            default_width,
            max_width,
        }
    }
}

// =============================================================================
// Request Parameters
// =============================================================================

/// Query parameters for upload requests.
#[derive(Debug, Default, Deserialize)]
pub struct UploadQueryParams {
    /// Output width in pixels (0 keeps the original size)
    #[serde(default)]
    pub width: Option<u32>,
}

// =============================================================================
// Response Types
// =============================================================================

/// JSON error response returned for all error conditions.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error type identifier (e.g., "unsupported_format", "decode_error")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code (included for convenience)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: None,
        }
    }

    /// Create a new error response with status code.
    pub fn with_status(
        error: impl Into<String>,
        message: impl Into<String>,
        status: StatusCode,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: Some(status.as_u16()),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

/// Response from the upload endpoint.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Whether a picture was stored
    pub stored: bool,

    /// Logical path of the stored picture, empty when nothing was uploaded
    pub path: String,
}

impl From<UploadOutcome> for UploadResponse {
    fn from(outcome: UploadOutcome) -> Self {
        let stored = outcome.is_stored();
        Self {
            stored,
            path: outcome.into_path_string(),
        }
    }
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Convert UploadError to HTTP response.
///
/// Client errors are logged at WARN level, everything else at ERROR.
impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            UploadError::UnrecognizedFormat { .. } => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, "unsupported_format")
            }
            UploadError::Decode { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "decode_error"),
            UploadError::Multipart(_) => (StatusCode::BAD_REQUEST, "invalid_multipart"),
            UploadError::InvalidIdentifier(_) => (StatusCode::BAD_REQUEST, "invalid_identifier"),
            UploadError::InvalidWidth { .. } => (StatusCode::BAD_REQUEST, "invalid_width"),
            UploadError::TooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large"),
            UploadError::Encode { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "encode_error"),
            UploadError::Io { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "io_error"),
            UploadError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };
        let message = self.to_string();

        if self.is_client_error() {
            warn!(
                error_type = error_type,
                status = status.as_u16(),
                "Client error: {}",
                message
            );
        } else {
            error!(
                error_type = error_type,
                status = status.as_u16(),
                "Server error: {}",
                message
            );
        }

        let error_response = ErrorResponse::with_status(error_type, message, status);

        (status, Json(error_response)).into_response()
    }
}

/// Reject identifiers that would escape the destination directory.
///
/// The pipeline uses identifiers verbatim, so the HTTP layer is where
/// untrusted input gets checked.
pub fn validate_identifier(identifier: &str) -> Result<(), UploadError> {
    let invalid = identifier.is_empty()
        || identifier.contains(|c: char| matches!(c, '/' | '\\' | '\0'))
        || identifier.contains("..");

    if invalid {
        return Err(UploadError::InvalidIdentifier(identifier.to_string()));
    }
    Ok(())
}

/// Reject output widths above `max`.
///
/// The resize buffer grows with the square of the width, so an unbounded
/// value lets a tiny upload exhaust memory.
pub fn validate_width(width: u32, max: u32) -> Result<(), UploadError> {
    if width > max {
        return Err(UploadError::InvalidWidth { width, max });
    }
    Ok(())
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle picture uploads.
///
/// # Endpoint
///
/// `POST /pictures/{identifier}`
///
/// # Query Parameters
///
/// - `width`: output width in pixels (defaults to the configured width; 0 keeps the size).
///   Values above the configured maximum are rejected.
///
/// # Request Body
///
/// `multipart/form-data` with a file part named `get_picture`. The part's
/// filename extension (jpg, jpeg, png, gif) selects the decoder.
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// { "stored": true, "path": "/images/u42.jpg" }
/// ```
/// When the form has no `get_picture` file part, `stored` is `false` and
/// `path` is empty.
///
/// # Errors
///
/// - `400 Bad Request`: invalid identifier, width above the maximum, or malformed
///   multipart body
/// - `413 Payload Too Large`: body exceeds the upload size limit
/// - `415 Unsupported Media Type`: filename is not an image
/// - `422 Unprocessable Entity`: content does not decode as the declared format
/// - `500 Internal Server Error`: file could not be written
pub async fn upload_handler(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
    Query(query): Query<UploadQueryParams>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, UploadError> {
    validate_identifier(&identifier)?;

    let width = query.width.unwrap_or(state.default_width);
    validate_width(width, state.max_width)?;

    let params = UploadParams::new(state.location.clone(), identifier, width);

    let outcome = state.upload_service.upload_file(multipart, params).await?;

    Ok(Json(UploadResponse::from(outcome)))
}

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0"
/// }
/// ```
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// Tests
// =============================================================================
