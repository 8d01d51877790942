//! Image format handling for uploaded pictures.
//!
//! The declared format of an upload comes from its filename only. There is no
//! magic-byte sniffing: the resolved [`ImageKind`] picks the decoder, and a
//! file whose content does not match its extension fails to decode.
//!
//! - [`ImageKind`]: the three accepted input formats (JPEG, PNG, GIF)
//! - [`decode`]: decode a byte stream with the codec for a given kind

pub mod decode;
pub mod kind;

pub use decode::{decode, decode_bytes, probe_dimensions};
pub use kind::{supported_extensions, ImageKind};
