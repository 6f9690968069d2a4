use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue},
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, ClientIdentity};
use crate::features::conversions::dtos::ConvertImageDto;
use crate::features::conversions::services::{ConversionRequest, ConversionService};
use crate::modules::imaging::Quality;
use crate::shared::constants::{HEADER_RATE_LIMIT_LIMIT, HEADER_RATE_LIMIT_REMAINING};
use crate::shared::types::ApiResponse;

/// Convert an image
///
/// Accepts one image as a data URI and returns it re-encoded in the requested
/// format, also as a data URI. Every request that passes validation counts
/// against the caller's rate limit, including ones whose image turns out to be
/// unreadable.
#[utoipa::path(
    post,
    path = "/api/convert",
    tag = "conversions",
    request_body = ConvertImageDto,
    responses(
        (status = 200, description = "Converted image as a data URI", body = ApiResponse<String>),
        (status = 400, description = "Invalid format, quality or image data"),
        (status = 413, description = "Request body too large"),
        (status = 429, description = "Too many requests, retry after the Retry-After delay"),
        (status = 500, description = "The image could not be processed")
    )
)]
pub async fn convert_image(
    client: ClientIdentity,
    State(service): State<Arc<ConversionService>>,
    AppJson(dto): AppJson<ConvertImageDto>,
) -> Result<(HeaderMap, Json<ApiResponse<String>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    if dto.quality.is_some() && !dto.format.accepts_quality() {
        tracing::debug!("Ignoring quality for {} output", dto.format);
    }

    let request = ConversionRequest {
        image: dto.image,
        format: dto.format,
        quality: dto.quality.map(Quality::new),
    };

    let outcome = service.convert(request, client.as_str()).await?;

    tracing::info!(
        "Converted image to {} ({} bytes) for client {}",
        outcome.format,
        outcome.bytes,
        client.as_str()
    );

    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static(HEADER_RATE_LIMIT_LIMIT),
        HeaderValue::from(outcome.rate_limit.limit),
    );
    headers.insert(
        HeaderName::from_static(HEADER_RATE_LIMIT_REMAINING),
        HeaderValue::from(outcome.rate_limit.remaining),
    );

    Ok((
        headers,
        Json(ApiResponse::success(Some(outcome.image), None, None)),
    ))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::http::StatusCode;
    use axum_test::TestServer;
    use image::{GenericImageView, ImageFormat};
    use serde_json::json;

    use crate::features::conversions::routes;
    use crate::features::rate_limits::dtos::RateLimitStatusDto;
    use crate::features::rate_limits::stores::{InMemoryRateLimitStore, RateLimitPolicy};
    use crate::features::rate_limits::RateLimitService;
    use crate::modules::imaging::RustCodec;
    use crate::shared::data_uri::parse_data_uri;
    use crate::shared::test_helpers::png_data_uri;
    use crate::shared::types::ApiResponse;

    use super::*;

    fn server(max_requests: u32) -> TestServer {
        let rate_limits = Arc::new(RateLimitService::new(Arc::new(
            InMemoryRateLimitStore::new(RateLimitPolicy {
                max_requests,
                window: Duration::from_secs(60),
            }),
        )));
        let conversions = Arc::new(ConversionService::new(
            Arc::clone(&rate_limits),
            Arc::new(RustCodec::new()),
            2,
            10 * 1024 * 1024,
        ));
        TestServer::new(routes(conversions, rate_limits, 16 * 1024 * 1024)).unwrap()
    }

    fn forwarded_for(ip: &'static str) -> (HeaderName, HeaderValue) {
        (
            HeaderName::from_static("x-forwarded-for"),
            HeaderValue::from_static(ip),
        )
    }

    async fn used_slots(server: &TestServer, ip: &'static str) -> u32 {
        let (name, value) = forwarded_for(ip);
        server
            .get("/api/convert/rate-limit")
            .add_header(name, value)
            .await
            .json::<ApiResponse<RateLimitStatusDto>>()
            .data
            .unwrap()
            .used
    }

    #[tokio::test]
    async fn test_convert_returns_data_uri() {
        let server = server(5);
        let (name, value) = forwarded_for("203.0.113.1");

        let response = server
            .post("/api/convert")
            .add_header(name, value)
            .json(&json!({ "image": png_data_uri(40, 20), "format": "webp", "quality": 70 }))
            .await;

        response.assert_status_ok();
        assert_eq!(response.header("x-ratelimit-limit"), "5");
        assert_eq!(response.header("x-ratelimit-remaining"), "4");

        let body = response.json::<ApiResponse<String>>();
        assert!(body.success);
        let uri = body.data.unwrap();
        assert!(uri.starts_with("data:image/webp;base64,"));
        let bytes = parse_data_uri(&uri).unwrap().bytes;
        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::WebP).unwrap();
        assert_eq!(decoded.dimensions(), (40, 20));
    }

    #[tokio::test]
    async fn test_convert_to_ico() {
        let server = server(5);
        let response = server
            .post("/api/convert")
            .json(&json!({ "image": png_data_uri(100, 100), "format": "ico", "quality": 3 }))
            .await;

        response.assert_status_ok();
        let uri = response.json::<ApiResponse<String>>().data.unwrap();
        assert!(uri.starts_with("data:image/x-icon;base64,"));
    }

    #[tokio::test]
    async fn test_rate_limited_after_capacity() {
        let server = server(2);
        let body = json!({ "image": png_data_uri(8, 8), "format": "png" });

        for _ in 0..2 {
            let (name, value) = forwarded_for("198.51.100.9");
            server
                .post("/api/convert")
                .add_header(name, value)
                .json(&body)
                .await
                .assert_status_ok();
        }

        let (name, value) = forwarded_for("198.51.100.9");
        let response = server
            .post("/api/convert")
            .add_header(name, value)
            .json(&body)
            .await;
        response.assert_status(StatusCode::TOO_MANY_REQUESTS);
        assert!(response.headers().contains_key("retry-after"));
        assert_eq!(response.header("x-ratelimit-remaining"), "0");
        assert!(!response.json::<ApiResponse<()>>().success);

        // A different client still has its full quota
        let (name, value) = forwarded_for("198.51.100.10");
        server
            .post("/api/convert")
            .add_header(name, value)
            .json(&body)
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn test_unknown_format_rejected_before_admission() {
        let server = server(5);
        let (name, value) = forwarded_for("192.0.2.1");

        let response = server
            .post("/api/convert")
            .add_header(name, value)
            .json(&json!({ "image": png_data_uri(8, 8), "format": "gif" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(used_slots(&server, "192.0.2.1").await, 0);
    }

    #[tokio::test]
    async fn test_out_of_range_quality_rejected_before_admission() {
        let server = server(5);

        for quality in [0, 101] {
            let (name, value) = forwarded_for("192.0.2.2");
            server
                .post("/api/convert")
                .add_header(name, value)
                .json(&json!({ "image": png_data_uri(8, 8), "format": "jpeg", "quality": quality }))
                .await
                .assert_status(StatusCode::BAD_REQUEST);
        }

        assert_eq!(used_slots(&server, "192.0.2.2").await, 0);
    }

    #[tokio::test]
    async fn test_malformed_image_is_bad_request_and_charged() {
        let server = server(5);
        let (name, value) = forwarded_for("192.0.2.3");

        let response = server
            .post("/api/convert")
            .add_header(name, value)
            .json(&json!({ "image": "not a data uri", "format": "webp" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(used_slots(&server, "192.0.2.3").await, 1);
    }

    #[tokio::test]
    async fn test_corrupt_image_is_server_error_with_detail() {
        let server = server(5);
        let response = server
            .post("/api/convert")
            .json(&json!({ "image": "data:image/png;base64,AAAAAAAA", "format": "png" }))
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let message = response.json::<ApiResponse<()>>().message.unwrap();
        assert!(message.contains("decode"), "message was {}", message);
    }

    #[tokio::test]
    async fn test_status_endpoint_is_free() {
        let server = server(3);
        for _ in 0..10 {
            assert_eq!(used_slots(&server, "192.0.2.4").await, 0);
        }
    }
}
