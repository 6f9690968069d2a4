use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use super::handlers::{convert_image, get_rate_limit_status};
use super::services::ConversionService;
use crate::features::rate_limits::RateLimitService;

/// Create routes for the conversions feature
///
/// `body_limit` bounds the JSON request, which carries the base64 image.
pub fn routes(
    conversion_service: Arc<ConversionService>,
    rate_limit_service: Arc<RateLimitService>,
    body_limit: usize,
) -> Router {
    let convert_routes = Router::new()
        .route(
            "/api/convert",
            post(convert_image).layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(conversion_service);

    let status_routes = Router::new()
        .route("/api/convert/rate-limit", get(get_rate_limit_status))
        .with_state(rate_limit_service);

    convert_routes.merge(status_routes)
}
