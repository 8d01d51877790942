//! Extraction of the uploaded picture from a multipart form.

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use bytes::Bytes;
use http::StatusCode;
use tracing::debug;

use crate::error::UploadError;

/// Form field carrying the picture.
pub const PICTURE_FIELD: &str = "get_picture";

/// A file part pulled out of a multipart form.
#[derive(Debug, Clone)]
pub struct UploadedPicture {
    /// Client-supplied filename; its suffix decides the decoder
    pub filename: String,

    /// Raw file content
    pub data: Bytes,
}

impl UploadedPicture {
    pub fn new(filename: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            data: data.into(),
        }
    }
}

/// Read the first [`PICTURE_FIELD`] file part from `multipart`.
///
/// Only file parts count: a `get_picture` part without a filename is a plain
/// form value and is skipped, as are parts with other names. Reading stops at
/// the first match.
///
/// Returns `Ok(None)` when the form holds no such file part.
///
/// # Errors
///
/// Returns [`UploadError::Multipart`] if the body is not valid multipart data,
/// or [`UploadError::TooLarge`] if it exceeds the request body limit.
pub async fn read_picture_field(
    multipart: &mut Multipart,
) -> Result<Option<UploadedPicture>, UploadError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(PICTURE_FIELD) {
            continue;
        }

        let filename = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => {
                debug!("Skipping {} part without filename", PICTURE_FIELD);
                continue;
            }
        };

        let data = field.bytes().await.map_err(multipart_error)?;

        debug!(filename = %filename, size = data.len(), "Read picture field");
        return Ok(Some(UploadedPicture { filename, data }));
    }

    Ok(None)
}

fn multipart_error(err: MultipartError) -> UploadError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        UploadError::TooLarge(err.body_text())
    } else {
        UploadError::Multipart(err.body_text())
    }
}
