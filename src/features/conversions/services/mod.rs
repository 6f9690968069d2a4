mod conversion_pipeline;
mod conversion_service;

pub use conversion_pipeline::{CodecStage, ICO_SIZE};
pub use conversion_service::{
    ConversionError, ConversionOutcome, ConversionRequest, ConversionService,
};
