//! Upload service orchestrating the picture pipeline.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                        UploadService                           │
//! │                                                                │
//! │  multipart ──► get_picture ──► resolve ──► decode ──► resize   │
//! │                 (absent:                                │      │
//! │                  NoUpload)                              ▼      │
//! │                                          ImageStore::persist   │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The pipeline is linear and stops at the first failing step. Resolution and
//! decoding run before the destination file is created, so a rejected upload
//! never leaves a file behind.

use axum::extract::Multipart;
use tracing::{debug, info};

use crate::error::UploadError;
use crate::format::{decode_bytes, ImageKind};

use super::multipart::{read_picture_field, UploadedPicture};
use super::resize::resize_to_width;
use super::store::{ImageStore, StoredImagePath};

// =============================================================================
// Upload Parameters
// =============================================================================

/// Where and how to store one upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadParams {
    /// Destination directory, e.g. `/users/images/`. Must exist below the
    /// store root and should end with `/`.
    pub location: String,

    /// Output filename stem. Used verbatim; collisions overwrite.
    pub identifier: String,

    /// Output width in pixels; 0 keeps the original size
    pub target_width: u32,
}

impl UploadParams {
    pub fn new(
        location: impl Into<String>,
        identifier: impl Into<String>,
        target_width: u32,
    ) -> Self {
        Self {
            location: location.into(),
            identifier: identifier.into(),
            target_width,
        }
    }
}

// =============================================================================
// Upload Outcome
// =============================================================================

/// Result of a successful upload call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The picture was stored at this logical path
    Stored(StoredImagePath),

    /// The request carried no picture; nothing was written
    NoUpload,
}

impl UploadOutcome {
    /// The stored path, if any.
    pub fn path(&self) -> Option<&StoredImagePath> {
        match self {
            UploadOutcome::Stored(path) => Some(path),
            UploadOutcome::NoUpload => None,
        }
    }

    pub fn is_stored(&self) -> bool {
        matches!(self, UploadOutcome::Stored(_))
    }

    /// The stored path as a string, or `""` when nothing was uploaded.
    pub fn into_path_string(self) -> String {
        match self {
            UploadOutcome::Stored(path) => path.into_string(),
            UploadOutcome::NoUpload => String::new(),
        }
    }
}

// =============================================================================
// Upload Service
// =============================================================================

/// Turns uploaded pictures into stored JPEG files.
///
/// # Example
///
/// ```no_run
/// use picture_upload::{ImageStore, UploadParams, UploadService, UploadedPicture};
///
/// let service = UploadService::new(ImageStore::current_dir());
/// let picture = UploadedPicture::new("photo.png", std::fs::read("photo.png").unwrap());
///
/// let path = service
///     .process(&picture, &UploadParams::new("/images/", "u42", 100))
///     .unwrap();
/// assert_eq!(path.as_str(), "/images/u42.jpg");
/// ```
#[derive(Debug, Clone, Default)]
pub struct UploadService {
    store: ImageStore,
}

impl UploadService {
    /// Create a service writing through `store`.
    pub fn new(store: ImageStore) -> Self {
        Self { store }
    }

    /// The underlying image store.
    pub fn store(&self) -> &ImageStore {
        &self.store
    }

    /// Run the pipeline on one picture.
    ///
    /// Resolve the format from the filename, decode, resize to
    /// `params.target_width` and persist as JPEG.
    ///
    /// # Errors
    ///
    /// - [`UploadError::UnrecognizedFormat`] if the filename suffix is not an
    ///   image extension; nothing is decoded or written
    /// - [`UploadError::Decode`] if the content is not a valid image of the
    ///   declared kind; nothing is written
    /// - [`UploadError::Io`] / [`UploadError::Encode`] if persisting fails
    pub fn process(
        &self,
        picture: &UploadedPicture,
        params: &UploadParams,
    ) -> Result<StoredImagePath, UploadError> {
        let kind = ImageKind::from_filename(&picture.filename).ok_or_else(|| {
            UploadError::UnrecognizedFormat {
                filename: picture.filename.clone(),
            }
        })?;

        debug!(
            identifier = %params.identifier,
            filename = %picture.filename,
            kind = %kind,
            size = picture.data.len(),
            "Processing picture"
        );

        let img = decode_bytes(&picture.data, kind)?;
        let img = resize_to_width(img, params.target_width);

        self.store.persist(&img, &params.location, &params.identifier)
    }

    /// Process an optional picture on the blocking thread pool.
    ///
    /// `None` yields [`UploadOutcome::NoUpload`] without touching the disk.
    pub async fn upload_picture(
        &self,
        picture: Option<UploadedPicture>,
        params: UploadParams,
    ) -> Result<UploadOutcome, UploadError> {
        let Some(picture) = picture else {
            info!(identifier = %params.identifier, "No picture in request");
            return Ok(UploadOutcome::NoUpload);
        };

        let service = self.clone();
        let path = tokio::task::spawn_blocking(move || service.process(&picture, &params))
            .await
            .map_err(|e| UploadError::Internal(format!("upload task failed: {}", e)))??;

        Ok(UploadOutcome::Stored(path))
    }

    /// Read the `get_picture` field from `multipart` and process it.
    ///
    /// A form without that field is not an error: it yields
    /// [`UploadOutcome::NoUpload`].
    pub async fn upload_file(
        &self,
        mut multipart: Multipart,
        params: UploadParams,
    ) -> Result<UploadOutcome, UploadError> {
        let picture = read_picture_field(&mut multipart).await?;
        self.upload_picture(picture, params).await
    }
}

// =============================================================================
// Tests
// =============================================================================
