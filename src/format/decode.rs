//! Decoding uploaded bytes into a raster image.
//!
//! The decoder is chosen from the [`ImageKind`] resolved from the filename,
//! never from the content. A PNG uploaded as `photo.jpg` is therefore a decode
//! error, not a silently accepted PNG.

use std::io::{BufRead, Cursor, Seek};

use image::{DynamicImage, ImageReader};
use tracing::debug;

use super::kind::ImageKind;
use crate::error::UploadError;

/// Decode a stream with the codec for `kind`.
///
/// The whole stream is consumed. For GIF input only the first frame is kept.
///
/// # Errors
///
/// Returns [`UploadError::Decode`] if the stream is not a valid `kind` image
/// (bad header, truncated data, unsupported sub-format).
pub fn decode<R: BufRead + Seek>(reader: R, kind: ImageKind) -> Result<DynamicImage, UploadError> {
    let img = ImageReader::with_format(reader, kind.image_format())
        .decode()
        .map_err(|e| UploadError::Decode {
            kind,
            message: e.to_string(),
        })?;

    debug!(
        kind = %kind,
        width = img.width(),
        height = img.height(),
        "Decoded upload"
    );

    Ok(img)
}

/// Decode an in-memory buffer with the codec for `kind`.
pub fn decode_bytes(data: &[u8], kind: ImageKind) -> Result<DynamicImage, UploadError> {
    decode(Cursor::new(data), kind)
}

/// Read `(width, height)` from the image header without decoding pixels.
pub fn probe_dimensions(data: &[u8], kind: ImageKind) -> Result<(u32, u32), UploadError> {
    ImageReader::with_format(Cursor::new(data), kind.image_format())
        .into_dimensions()
        .map_err(|e| UploadError::Decode {
            kind,
            message: e.to_string(),
        })
}
