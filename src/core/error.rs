use axum::{
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::features::conversions::ConversionError;
use crate::features::rate_limits::stores::RateLimitStoreError;
use crate::shared::constants::{HEADER_RATE_LIMIT_LIMIT, HEADER_RATE_LIMIT_REMAINING};
use crate::shared::types::ApiResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Image processing failed: {0}")]
    Codec(String),

    #[error("Rate limit exceeded: {message}")]
    RateLimitExceeded {
        message: String,
        limit: u32,
        retry_after_secs: u64,
    },
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut rate_limit_headers = None;

        let (status, message, errors) = match self {
            AppError::Validation(ref msg) => (
                StatusCode::BAD_REQUEST,
                msg.clone(),
                Some(vec![msg.clone()]),
            ),
            AppError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
            AppError::Codec(ref msg) => {
                tracing::error!("Codec error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone(), None)
            }
            AppError::RateLimitExceeded {
                ref message,
                limit,
                retry_after_secs,
            } => {
                rate_limit_headers = Some((limit, retry_after_secs));
                (StatusCode::TOO_MANY_REQUESTS, message.clone(), None)
            }
        };

        let body = Json(ApiResponse::<()>::error(Some(message), errors));
        let mut response = (status, body).into_response();

        if let Some((limit, retry_after_secs)) = rate_limit_headers {
            let headers = response.headers_mut();
            headers.insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
            headers.insert(
                HeaderName::from_static(HEADER_RATE_LIMIT_LIMIT),
                HeaderValue::from(limit),
            );
            headers.insert(
                HeaderName::from_static(HEADER_RATE_LIMIT_REMAINING),
                HeaderValue::from(0u32),
            );
        }

        response
    }
}

impl From<RateLimitStoreError> for AppError {
    fn from(e: RateLimitStoreError) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl From<ConversionError> for AppError {
    fn from(e: ConversionError) -> Self {
        match e {
            ConversionError::RateLimited {
                limit,
                retry_after,
            } => AppError::RateLimitExceeded {
                message: e.to_string(),
                limit,
                // Round up so clients never retry a moment too early
                retry_after_secs: retry_after.as_secs()
                    + u64::from(retry_after.subsec_nanos() > 0),
            },
            ConversionError::InvalidInput(_) => AppError::BadRequest(e.to_string()),
            ConversionError::CodecFailure { .. } => AppError::Codec(e.to_string()),
            ConversionError::RateLimitBackend(_) | ConversionError::Internal(_) => {
                AppError::Internal(e.to_string())
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
