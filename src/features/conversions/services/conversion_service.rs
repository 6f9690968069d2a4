use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::{debug, error, warn};

use super::conversion_pipeline::CodecStage;
use crate::features::conversions::models::OutputFormat;
use crate::features::rate_limits::stores::{RateLimitDecision, RateLimitStoreError};
use crate::features::rate_limits::RateLimitService;
use crate::modules::imaging::{CodecError, ImageCodec, Quality};
use crate::shared::data_uri::{encode_data_uri, parse_data_uri};

/// A validated conversion request
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    /// Source image as a data URI
    pub image: String,
    pub format: OutputFormat,
    pub quality: Option<Quality>,
}

/// Result of a successful conversion
#[derive(Debug, Clone)]
pub struct ConversionOutcome {
    /// `data:<mime>;base64,<payload>` in the requested format
    pub image: String,
    pub format: OutputFormat,
    /// Size of the encoded output before base64
    pub bytes: usize,
    /// Quota left after this request was admitted
    pub rate_limit: RateLimitDecision,
}

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("Too many conversion requests, try again in {}s", .retry_after.as_secs().max(1))]
    RateLimited { limit: u32, retry_after: Duration },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Converting to {format} failed during {stage}: {source}")]
    CodecFailure {
        format: OutputFormat,
        stage: CodecStage,
        #[source]
        source: CodecError,
    },

    #[error(transparent)]
    RateLimitBackend(#[from] RateLimitStoreError),

    #[error("Conversion task failed: {0}")]
    Internal(String),
}

/// Rate-limited conversion of data-URI images between formats
pub struct ConversionService {
    rate_limiter: Arc<RateLimitService>,
    codec: Arc<dyn ImageCodec>,
    codec_permits: Arc<Semaphore>,
    max_image_bytes: usize,
}

impl ConversionService {
    pub fn new(
        rate_limiter: Arc<RateLimitService>,
        codec: Arc<dyn ImageCodec>,
        max_concurrent: usize,
        max_image_bytes: usize,
    ) -> Self {
        Self {
            rate_limiter,
            codec,
            codec_permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
            max_image_bytes,
        }
    }

    /// Convert one image on behalf of `client_id`.
    ///
    /// Admission is checked first, so every admitted attempt is charged to the
    /// client even when the input later turns out to be malformed.
    pub async fn convert(
        &self,
        request: ConversionRequest,
        client_id: &str,
    ) -> Result<ConversionOutcome, ConversionError> {
        let decision = self.rate_limiter.limit(client_id).await?;
        if !decision.allowed {
            warn!(
                "Rate limit exceeded for client {} (retry after {:?})",
                client_id, decision.reset_after
            );
            return Err(ConversionError::RateLimited {
                limit: decision.limit,
                retry_after: decision.reset_after,
            });
        }
        debug!(
            "Conversion to {} admitted for client {} ({} remaining)",
            request.format, client_id, decision.remaining
        );

        let source = parse_data_uri(&request.image).map_err(|e| {
            warn!("Rejected conversion input from client {}: {}", client_id, e);
            ConversionError::InvalidInput(e.to_string())
        })?;

        if source.bytes.len() > self.max_image_bytes {
            warn!(
                "Rejected {} byte image from client {} (limit {})",
                source.bytes.len(),
                client_id,
                self.max_image_bytes
            );
            return Err(ConversionError::InvalidInput(format!(
                "image is {} bytes, maximum is {} bytes",
                source.bytes.len(),
                self.max_image_bytes
            )));
        }

        let input_bytes = source.bytes.len();
        debug!(
            "Decoded {} byte source (declared {}) for client {}",
            input_bytes,
            source.declared_mime().unwrap_or("no mime"),
            client_id
        );
        let format = request.format;
        let quality = request.quality;

        // Waiting for a permit happens after admission, so a busy codec pool never
        // delays other clients' rate limit checks
        let permit = Arc::clone(&self.codec_permits)
            .acquire_owned()
            .await
            .map_err(|e| ConversionError::Internal(e.to_string()))?;
        let codec = Arc::clone(&self.codec);

        let output = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            format.convert(codec.as_ref(), &source.bytes, quality)
        })
        .await
        .map_err(|e| ConversionError::Internal(e.to_string()))?
        .map_err(|(stage, source)| {
            error!(
                "Conversion to {} failed during {} for client {}: {}",
                format, stage, client_id, source
            );
            ConversionError::CodecFailure {
                format,
                stage,
                source,
            }
        })?;

        debug!(
            "Converted {} bytes to {} bytes of {} for client {}",
            input_bytes,
            output.len(),
            format,
            client_id
        );

        Ok(ConversionOutcome {
            image: encode_data_uri(format.mime_type(), &output),
            format,
            bytes: output.len(),
            rate_limit: decision,
        })
    }
}
