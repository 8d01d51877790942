//! # Picture Upload
//!
//! A server-side helper that takes an image uploaded through a multipart form
//! field, decodes it (JPEG, PNG or GIF), resizes it to a target width while
//! keeping the aspect ratio, and stores it as a quality-50 JPEG under a
//! caller-supplied identifier.
//!
//! ## Pipeline
//!
//! ```text
//! get_picture ──► resolve ──► decode ──► resize ──► persist ──► "/images/u42.jpg"
//!                (filename   (image     (Lanczos3) (JPEG q50)
//!                 suffix)     codec)
//! ```
//!
//! ## Modules
//!
//! - [`mod@format`] - Extension resolution and decoding
//! - [`picture`] - Resize, persistence and the upload service
//! - [`server`] - Axum-based HTTP server and routes
//! - [`config`] - CLI and configuration types
//! - [`error`] - Error types
//!
//! ## Example
//!
//! ```rust,no_run
//! use picture_upload::{ImageStore, UploadParams, UploadService, UploadedPicture};
//!
//! let service = UploadService::new(ImageStore::current_dir());
//! let picture = UploadedPicture::new("photo.JPEG", std::fs::read("photo.JPEG").unwrap());
//!
//! // Writes ./images/u42.jpg, 100 pixels wide
//! let path = service
//!     .process(&picture, &UploadParams::new("/images/", "u42", 100))
//!     .unwrap();
//! assert_eq!(path.as_str(), "/images/u42.jpg");
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod picture;
pub mod server;

// Re-export commonly used types
pub use config::{Cli, Command, ProcessConfig, ServeConfig};
pub use error::UploadError;
pub use format::{decode, decode_bytes, probe_dimensions, supported_extensions, ImageKind};
pub use picture::{
    read_picture_field, resize_to_width, scaled_height, ImageStore, StoredImagePath,
    UploadOutcome, UploadParams, UploadService, UploadedPicture, PICTURE_FIELD,
    STORED_JPEG_QUALITY,
};
pub use server::{
    create_router, health_handler, upload_handler, AppState, ErrorResponse, HealthResponse,
    RouterConfig, UploadResponse,
};
