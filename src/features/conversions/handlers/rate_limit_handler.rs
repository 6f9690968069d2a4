use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::Result;
use crate::core::extractor::ClientIdentity;
use crate::features::rate_limits::dtos::RateLimitStatusDto;
use crate::features::rate_limits::RateLimitService;
use crate::shared::types::ApiResponse;

/// Get the caller's conversion quota
///
/// Does not consume a conversion slot.
#[utoipa::path(
    get,
    path = "/api/convert/rate-limit",
    responses(
        (status = 200, description = "Caller's rate limit status", body = ApiResponse<RateLimitStatusDto>)
    ),
    tag = "conversions"
)]
pub async fn get_rate_limit_status(
    client: ClientIdentity,
    State(service): State<Arc<RateLimitService>>,
) -> Result<Json<ApiResponse<RateLimitStatusDto>>> {
    let status = service.get_client_status(client.as_str()).await?;
    Ok(Json(ApiResponse::success(Some(status), None, None)))
}
