//! JPEG persistence of processed pictures.
//!
//! Every stored picture is a JPEG at quality [`STORED_JPEG_QUALITY`],
//! whatever the input format was. The file lands at
//! `<root>/<location><identifier>.jpg`; the path handed back to the caller is
//! the root-less `<location><identifier>.jpg`, suitable for a URL or a
//! database column.
//!
//! # Behavior
//!
//! - The destination directory must already exist. It is never created.
//! - An existing file with the same name is truncated and overwritten.
//! - Writes go straight to the destination. If encoding fails halfway, a
//!   partial file may remain.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageError};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::UploadError;

/// JPEG quality (1-100) of every stored picture.
pub const STORED_JPEG_QUALITY: u8 = 50;

/// Extension of every stored picture.
pub const STORED_EXTENSION: &str = "jpg";

// =============================================================================
// StoredImagePath
// =============================================================================

/// Logical path of a stored picture: `<location><identifier>.jpg`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct StoredImagePath(String);

impl StoredImagePath {
    /// Build the logical path for `identifier` under `location`.
    ///
    /// Plain concatenation: `location` is expected to end with `/`.
    pub fn new(location: &str, identifier: &str) -> Self {
        Self(format!("{}{}.{}", location, identifier, STORED_EXTENSION))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for StoredImagePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StoredImagePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// ImageStore
// =============================================================================

/// Writes pictures as JPEG files below a root directory.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    /// Create a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create a store rooted at the process working directory (`.`).
    pub fn current_dir() -> Self {
        Self::new(".")
    }

    /// The root directory physical paths are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// On-disk directory for `location`.
    pub fn directory(&self, location: &str) -> PathBuf {
        self.root.join(location.trim_start_matches('/'))
    }

    /// On-disk target for `identifier` under `location`.
    ///
    /// With a root of `.` and a location of `/users/images/` this is
    /// `./users/images/<identifier>.jpg`.
    pub fn physical_path(&self, location: &str, identifier: &str) -> PathBuf {
        let logical = StoredImagePath::new(location, identifier);
        self.root.join(logical.as_str().trim_start_matches('/'))
    }

    /// Encode `img` as JPEG and write it for `identifier` under `location`.
    ///
    /// # Errors
    ///
    /// - [`UploadError::Io`] if the file cannot be created or written
    ///   (including a missing destination directory)
    /// - [`UploadError::Encode`] if JPEG encoding fails
    pub fn persist(
        &self,
        img: &DynamicImage,
        location: &str,
        identifier: &str,
    ) -> Result<StoredImagePath, UploadError> {
        let path = self.physical_path(location, identifier);

        let file = File::create(&path).map_err(|e| UploadError::io(&path, e))?;
        let mut writer = BufWriter::new(file);

        encode_jpeg(img, &mut writer).map_err(|e| match e {
            ImageError::IoError(io_err) => UploadError::io(&path, io_err),
            other => UploadError::Encode {
                message: other.to_string(),
            },
        })?;
        writer.flush().map_err(|e| UploadError::io(&path, e))?;

        let stored = StoredImagePath::new(location, identifier);
        info!(
            path = %stored,
            file = %path.display(),
            width = img.width(),
            height = img.height(),
            "Stored picture"
        );

        Ok(stored)
    }
}

impl Default for ImageStore {
    fn default() -> Self {
        Self::current_dir()
    }
}

/// Encode at [`STORED_JPEG_QUALITY`].
///
/// JPEG carries neither alpha nor 16-bit samples, so anything other than
/// 8-bit gray or RGB is flattened to 8-bit RGB first.
fn encode_jpeg<W: Write>(img: &DynamicImage, writer: W) -> Result<(), ImageError> {
    let mut encoder = JpegEncoder::new_with_quality(writer, STORED_JPEG_QUALITY);

    match img {
        DynamicImage::ImageLuma8(gray) => encoder.encode_image(gray),
        DynamicImage::ImageRgb8(rgb) => encoder.encode_image(rgb),
        other => {
            debug!(color = ?other.color(), "Flattening to RGB8 for JPEG");
            encoder.encode_image(&other.to_rgb8())
        }
    }
}
