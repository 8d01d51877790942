//! Picture pipeline: multipart extraction, resize, JPEG persistence.
//!
//! # Components
//!
//! - [`UploadService`]: entry point, runs resolve → decode → resize → persist
//! - [`read_picture_field`]: pulls the `get_picture` file part out of a form
//! - [`resize_to_width`]: aspect-preserving Lanczos3 resize
//! - [`ImageStore`]: writes JPEG files (quality 50) below a root directory
//! - [`StoredImagePath`]: the logical `<location><identifier>.jpg` path
//! - [`UploadOutcome`]: stored path, or the explicit "no upload" result

mod multipart;
mod resize;
mod service;
mod store;

pub use multipart::{read_picture_field, UploadedPicture, PICTURE_FIELD};
pub use resize::{resize_to_width, scaled_height, RESIZE_FILTER};
pub use service::{UploadOutcome, UploadParams, UploadService};
pub use store::{ImageStore, StoredImagePath, STORED_EXTENSION, STORED_JPEG_QUALITY};
