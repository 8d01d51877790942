//! Extension-based format resolution.
//!
//! Maps a filename's trailing suffix (after the last `.`) to an [`ImageKind`],
//! ignoring letter case. Both `jpg` and `jpeg` resolve to JPEG. Anything else,
//! including a filename without a `.`, is "not an image" and resolves to `None`.

use std::fmt;

use image::ImageFormat;

// =============================================================================
// ImageKind
// =============================================================================

/// An image format accepted for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKind {
    /// JPEG (`.jpg`, `.jpeg`)
    Jpeg,

    /// PNG (`.png`)
    Png,

    /// GIF (`.gif`), only the first frame is used
    Gif,
}

/// Recognized suffixes, lowercase. Matching is case-insensitive.
const EXTENSION_TABLE: &[(&str, ImageKind)] = &[
    ("jpg", ImageKind::Jpeg),
    ("jpeg", ImageKind::Jpeg),
    ("png", ImageKind::Png),
    ("gif", ImageKind::Gif),
];

impl ImageKind {
    /// Resolve the kind declared by a filename.
    ///
    /// Returns `None` when the filename has no `.` or its suffix is not in the
    /// recognized set.
    ///
    /// ```
    /// use picture_upload::ImageKind;
    ///
    /// assert_eq!(ImageKind::from_filename("photo.JPEG"), Some(ImageKind::Jpeg));
    /// assert_eq!(ImageKind::from_filename("doc.pdf"), None);
    /// assert_eq!(ImageKind::from_filename("README"), None);
    /// ```
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, extension) = filename.rsplit_once('.')?;
        Self::from_extension(extension)
    }

    /// Resolve a bare extension (without the leading `.`).
    pub fn from_extension(extension: &str) -> Option<Self> {
        EXTENSION_TABLE
            .iter()
            .find(|(ext, _)| ext.eq_ignore_ascii_case(extension))
            .map(|(_, kind)| *kind)
    }

    /// The `image` crate format used to decode this kind.
    pub const fn image_format(&self) -> ImageFormat {
        match self {
            ImageKind::Jpeg => ImageFormat::Jpeg,
            ImageKind::Png => ImageFormat::Png,
            ImageKind::Gif => ImageFormat::Gif,
        }
    }

    /// Human-readable name.
    pub const fn name(&self) -> &'static str {
        match self {
            ImageKind::Jpeg => "JPEG",
            ImageKind::Png => "PNG",
            ImageKind::Gif => "GIF",
        }
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// All recognized extensions, lowercase.
pub fn supported_extensions() -> impl Iterator<Item = &'static str> {
    EXTENSION_TABLE.iter().map(|(ext, _)| *ext)
}

// =============================================================================
// Tests
// =============================================================================
