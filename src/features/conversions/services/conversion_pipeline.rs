//! Synchronous codec pipelines, one per output format.
//!
//! Everything here is CPU-bound and runs on the blocking pool.

use std::fmt;

use crate::features::conversions::models::OutputFormat;
use crate::modules::imaging::{CodecError, ImageCodec, Quality};

/// Edge length of generated icons
pub const ICO_SIZE: u32 = 64;

/// Pipeline step a codec failure is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecStage {
    /// Reading the caller's image
    Decode,
    /// Re-encoding the source to the JPEG intermediate (ICO only)
    Normalize,
    /// Producing the requested format
    Encode,
}

impl fmt::Display for CodecStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecStage::Decode => f.write_str("decode"),
            CodecStage::Normalize => f.write_str("normalization"),
            CodecStage::Encode => f.write_str("encode"),
        }
    }
}

pub type StageResult<T> = Result<T, (CodecStage, CodecError)>;

fn at(stage: CodecStage) -> impl FnOnce(CodecError) -> (CodecStage, CodecError) {
    move |e| (stage, e)
}

impl OutputFormat {
    /// Convert `source` bytes into this format.
    ///
    /// `quality` falls back to [`Quality::DEFAULT`]; the ICO pipeline ignores it.
    pub fn convert(
        self,
        codec: &dyn ImageCodec,
        source: &[u8],
        quality: Option<Quality>,
    ) -> StageResult<Vec<u8>> {
        let quality = quality.unwrap_or_default();

        match self {
            OutputFormat::Webp => {
                let img = codec.decode(source).map_err(at(CodecStage::Decode))?;
                codec
                    .encode_webp(&img, quality)
                    .map_err(at(CodecStage::Encode))
            }
            OutputFormat::Png => {
                let img = codec.decode(source).map_err(at(CodecStage::Decode))?;
                codec
                    .encode_png(&img, quality)
                    .map_err(at(CodecStage::Encode))
            }
            OutputFormat::Jpeg => {
                let img = codec.decode(source).map_err(at(CodecStage::Decode))?;
                codec
                    .encode_jpeg(&img, quality)
                    .map_err(at(CodecStage::Encode))
            }
            OutputFormat::Ico => {
                let intermediate = normalize_to_jpeg(codec, source)?;
                encode_ico(codec, &intermediate)
            }
        }
    }
}

/// ICO step 1: re-encode any decodable source as a full-quality JPEG
pub fn normalize_to_jpeg(codec: &dyn ImageCodec, source: &[u8]) -> StageResult<Vec<u8>> {
    let img = codec.decode(source).map_err(at(CodecStage::Decode))?;
    codec
        .encode_jpeg(&img, Quality::MAX)
        .map_err(at(CodecStage::Normalize))
}

/// ICO step 2: wrap the JPEG intermediate in a single 64×64 colour icon
pub fn encode_ico(codec: &dyn ImageCodec, jpeg: &[u8]) -> StageResult<Vec<u8>> {
    let img = codec.decode(jpeg).map_err(at(CodecStage::Normalize))?;
    codec
        .encode_ico(&img, ICO_SIZE)
        .map_err(at(CodecStage::Encode))
}
