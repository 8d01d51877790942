use thiserror::Error;

use crate::format::ImageKind;

/// Errors that can occur while turning an uploaded picture into a stored JPEG.
#[derive(Debug, Clone, Error)]
pub enum UploadError {
    /// Filename suffix is not one of jpg, jpeg, png or gif (should map to HTTP 415)
    #[error("File is not an image: {filename}")]
    UnrecognizedFormat { filename: String },

    /// Bytes are not a valid encoding of the claimed format
    #[error("Failed to decode {kind} image: {message}")]
    Decode { kind: ImageKind, message: String },

    /// JPEG encoding of the resized image failed
    #[error("Failed to encode JPEG: {message}")]
    Encode { message: String },

    /// Destination file could not be created or written
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    /// Multipart body could not be read
    #[error("Invalid multipart body: {0}")]
    Multipart(String),

    /// Request body exceeds the configured upload limit
    #[error("Upload too large: {0}")]
    TooLarge(String),

    /// Requested output width exceeds the configured maximum
    #[error("Width {width} exceeds the maximum of {max}")]
    InvalidWidth { width: u32, max: u32 },

    /// Identifier rejected by the HTTP layer before reaching the pipeline
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Background processing task failed to complete
    #[error("Internal error: {0}")]
    Internal(String),
}

impl UploadError {
    /// Build an `Io` error from a path and the underlying `std::io::Error`.
    pub fn io(path: impl AsRef<std::path::Path>, err: std::io::Error) -> Self {
        UploadError::Io {
            path: path.as_ref().display().to_string(),
            message: err.to_string(),
        }
    }

    /// Whether the failure is attributable to the uploaded content or request.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            UploadError::UnrecognizedFormat { .. }
                | UploadError::Decode { .. }
                | UploadError::Multipart(_)
                | UploadError::TooLarge(_)
                | UploadError::InvalidWidth { .. }
                | UploadError::InvalidIdentifier(_)
        )
    }
}
