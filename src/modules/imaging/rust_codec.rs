//! Pure `image` crate backend, with libwebp for lossy WebP.
//!
//! The `image` crate's own WebP encoder is lossless only, so quality would be
//! meaningless for WebP output; `webp::Encoder` is used instead.

use std::io::Cursor;

use image::codecs::ico::IcoEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder};
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageReader};

use super::codec::{CodecError, ImageCodec};
use super::params::Quality;

/// Largest icon edge the ICO directory format can describe
const MAX_ICO_SIZE: u32 = 256;

/// Production codec backed by the `image` and `webp` crates.
pub struct RustCodec;

impl RustCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustCodec {
    fn default() -> Self {
        Self::new()
    }
}

/// Collapse exotic pixel layouts (16-bit, float, luma) into RGB8/RGBA8,
/// which every encoder here accepts.
fn to_8bit(img: &DynamicImage) -> DynamicImage {
    match img {
        DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => img.clone(),
        _ if img.color().has_alpha() => DynamicImage::ImageRgba8(img.to_rgba8()),
        _ => DynamicImage::ImageRgb8(img.to_rgb8()),
    }
}

fn png_compression(quality: Quality) -> CompressionType {
    match quality.value() {
        90..=100 => CompressionType::Fast,
        50..=89 => CompressionType::Default,
        _ => CompressionType::Best,
    }
}

impl ImageCodec for RustCodec {
    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, CodecError> {
        if bytes.is_empty() {
            return Err(CodecError::Decode("image is empty".to_string()));
        }

        ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| CodecError::Decode(e.to_string()))?
            .decode()
            .map_err(|e| CodecError::Decode(e.to_string()))
    }

    fn encode_webp(&self, img: &DynamicImage, quality: Quality) -> Result<Vec<u8>, CodecError> {
        let img = to_8bit(img);
        let encoder = webp::Encoder::from_image(&img).map_err(|e| CodecError::encode("webp", e))?;
        let encoded = encoder
            .encode_simple(false, quality.value() as f32)
            .map_err(|e| CodecError::encode("webp", format!("{:?}", e)))?;
        Ok(encoded.to_vec())
    }

    fn encode_png(&self, img: &DynamicImage, quality: Quality) -> Result<Vec<u8>, CodecError> {
        let img = to_8bit(img);
        let mut buf = Cursor::new(Vec::new());
        let encoder = PngEncoder::new_with_quality(
            &mut buf,
            png_compression(quality),
            PngFilterType::Adaptive,
        );
        img.write_with_encoder(encoder)
            .map_err(|e| CodecError::encode("png", e))?;
        Ok(buf.into_inner())
    }

    fn encode_jpeg(&self, img: &DynamicImage, quality: Quality) -> Result<Vec<u8>, CodecError> {
        // JPEG has no alpha channel
        let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
        let mut buf = Cursor::new(Vec::new());
        let encoder = JpegEncoder::new_with_quality(&mut buf, quality.value());
        rgb.write_with_encoder(encoder)
            .map_err(|e| CodecError::encode("jpeg", e))?;
        Ok(buf.into_inner())
    }

    fn encode_ico(&self, img: &DynamicImage, size: u32) -> Result<Vec<u8>, CodecError> {
        if size == 0 || size > MAX_ICO_SIZE {
            return Err(CodecError::encode(
                "ico",
                format!("icon size must be between 1 and {}, got {}", MAX_ICO_SIZE, size),
            ));
        }

        let icon = img.resize_exact(size, size, FilterType::Lanczos3).to_rgba8();
        let mut buf = Cursor::new(Vec::new());
        IcoEncoder::new(&mut buf)
            .write_image(icon.as_raw(), size, size, ExtendedColorType::Rgba8)
            .map_err(|e| CodecError::encode("ico", e))?;
        Ok(buf.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{jpeg_bytes, photo_image, png_bytes, translucent_image};
    use image::{GenericImageView, ImageFormat};

    #[test]
    fn decode_png_and_jpeg() {
        let codec = RustCodec::new();
        assert_eq!(codec.decode(&png_bytes(40, 30)).unwrap().dimensions(), (40, 30));
        assert_eq!(codec.decode(&jpeg_bytes(17, 9)).unwrap().dimensions(), (17, 9));
    }

    #[test]
    fn decode_empty_bytes_errors() {
        let err = RustCodec::new().decode(&[]).unwrap_err();
        assert!(matches!(err, CodecError::Decode(_)));
    }

    #[test]
    fn decode_garbage_errors() {
        let err = RustCodec::new().decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, CodecError::Decode(_)));
    }

    #[test]
    fn decode_truncated_png_errors() {
        let bytes = png_bytes(64, 64);
        let err = RustCodec::new().decode(&bytes[..bytes.len() / 2]).unwrap_err();
        assert!(matches!(err, CodecError::Decode(_)));
    }

    #[test]
    fn webp_output_keeps_dimensions() {
        let codec = RustCodec::new();
        let bytes = codec
            .encode_webp(&photo_image(120, 80), Quality::DEFAULT)
            .unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::WebP);
        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::WebP).unwrap();
        assert_eq!(decoded.dimensions(), (120, 80));
    }

    #[test]
    fn webp_accepts_alpha_sources() {
        let codec = RustCodec::new();
        let bytes = codec
            .encode_webp(&translucent_image(32, 32), Quality::new(60))
            .unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::WebP);
    }

    #[test]
    fn jpeg_flattens_alpha() {
        let codec = RustCodec::new();
        let bytes = codec
            .encode_jpeg(&translucent_image(24, 12), Quality::DEFAULT)
            .unwrap();
        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Jpeg).unwrap();
        assert_eq!(decoded.dimensions(), (24, 12));
        assert!(!decoded.color().has_alpha());
    }

    #[test]
    fn png_is_lossless_at_any_quality() {
        let codec = RustCodec::new();
        let source = photo_image(50, 50);
        for quality in [1, 60, 100] {
            let bytes = codec.encode_png(&source, Quality::new(quality)).unwrap();
            let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Png).unwrap();
            assert_eq!(decoded.to_rgb8(), source.to_rgb8());
        }
    }

    #[test]
    fn png_compression_follows_quality() {
        assert!(matches!(png_compression(Quality::new(100)), CompressionType::Fast));
        assert!(matches!(png_compression(Quality::new(80)), CompressionType::Default));
        assert!(matches!(png_compression(Quality::new(10)), CompressionType::Best));
    }

    #[test]
    fn ico_is_exact_square() {
        let codec = RustCodec::new();
        let bytes = codec.encode_ico(&photo_image(300, 120), 64).unwrap();
        // ICONDIR: reserved = 0, type = 1 (icon), count = 1
        assert_eq!(&bytes[0..6], &[0, 0, 1, 0, 1, 0]);
        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Ico).unwrap();
        assert_eq!(decoded.dimensions(), (64, 64));
    }

    #[test]
    fn ico_rejects_oversized_icons() {
        let err = RustCodec::new()
            .encode_ico(&photo_image(8, 8), 512)
            .unwrap_err();
        assert!(matches!(err, CodecError::Encode { format: "ico", .. }));
    }
}
