//! Aspect-preserving resize to a target width.
//!
//! Height follows from the source aspect ratio, rounded to the nearest pixel
//! and never below 1. A target width of 0 means "keep the original size".
//! Resampling uses the Lanczos3 filter.

use image::imageops::FilterType;
use image::DynamicImage;
use tracing::debug;

/// Filter used for every resize.
pub const RESIZE_FILTER: FilterType = FilterType::Lanczos3;

/// Height that keeps the `width:height` ratio at `target_width`.
///
/// Computes `round(height * target_width / width)` in integer arithmetic,
/// clamped to at least 1. Returns `height` unchanged when `width` or
/// `target_width` is 0.
pub fn scaled_height(width: u32, height: u32, target_width: u32) -> u32 {
    if width == 0 || target_width == 0 {
        return height;
    }

    let width = u64::from(width);
    let scaled = (u64::from(height) * u64::from(target_width) + width / 2) / width;

    scaled.clamp(1, u64::from(u32::MAX)) as u32
}

/// Resize `img` to `target_width` pixels wide, preserving aspect ratio.
///
/// A `target_width` of 0, or one equal to the current width, returns the
/// image untouched.
pub fn resize_to_width(img: DynamicImage, target_width: u32) -> DynamicImage {
    let (width, height) = (img.width(), img.height());

    if target_width == 0 || target_width == width {
        debug!(width, height, "Keeping original size");
        return img;
    }

    let target_height = scaled_height(width, height, target_width);
    debug!(
        width,
        height, target_width, target_height, "Resizing with Lanczos3"
    );

    img.resize_exact(target_width, target_height, RESIZE_FILTER)
}
