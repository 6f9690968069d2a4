use image::DynamicImage;
use thiserror::Error;

use super::params::Quality;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode {format}: {message}")]
    Encode {
        format: &'static str,
        message: String,
    },
}

impl CodecError {
    pub fn encode(format: &'static str, message: impl ToString) -> Self {
        Self::Encode {
            format,
            message: message.to_string(),
        }
    }
}

/// Image decode/encode capability.
///
/// Implementations are synchronous and CPU-bound; callers are expected to run
/// them off the async executor.
pub trait ImageCodec: Send + Sync {
    /// Decode raw bytes of any supported container into pixels.
    fn decode(&self, bytes: &[u8]) -> Result<DynamicImage, CodecError>;

    /// Lossy WebP at the given quality.
    fn encode_webp(&self, img: &DynamicImage, quality: Quality) -> Result<Vec<u8>, CodecError>;

    /// Lossless PNG; quality selects compression effort.
    fn encode_png(&self, img: &DynamicImage, quality: Quality) -> Result<Vec<u8>, CodecError>;

    /// Baseline JPEG at the given quality (alpha is flattened).
    fn encode_jpeg(&self, img: &DynamicImage, quality: Quality) -> Result<Vec<u8>, CodecError>;

    /// Single-entry colour ICO of exactly `size`×`size` pixels.
    fn encode_ico(&self, img: &DynamicImage, size: u32) -> Result<Vec<u8>, CodecError>;
}
