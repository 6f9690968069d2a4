//! Image codec capability
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** (JPEG, PNG, WebP, GIF, BMP, ICO) | `image::ImageReader` with guessed format |
//! | **Encode → WebP** (lossy) | `webp::Encoder` (libwebp) |
//! | **Encode → PNG** | `image::codecs::png::PngEncoder` |
//! | **Encode → JPEG** | `image::codecs::jpeg::JpegEncoder` |
//! | **Encode → ICO** | `image::codecs::ico::IcoEncoder` after an exact Lanczos3 resize |
//!
//! Features depend on the [`ImageCodec`] trait only, so the backend can be
//! swapped (or mocked) without touching conversion logic.

mod codec;
mod params;
mod rust_codec;

pub use codec::{CodecError, ImageCodec};
pub use params::Quality;
pub use rust_codec::RustCodec;
