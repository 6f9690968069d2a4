use utoipa::{Modify, OpenApi};

use crate::features::conversions::{dtos as conversions_dtos, handlers as conversions_handlers};
use crate::features::conversions::models as conversions_models;
use crate::features::rate_limits::dtos as rate_limits_dtos;
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Conversions
        conversions_handlers::conversion_handler::convert_image,
        conversions_handlers::rate_limit_handler::get_rate_limit_status,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Conversions
            conversions_models::OutputFormat,
            conversions_dtos::ConvertImageDto,
            ApiResponse<String>,
            // Rate Limits
            rate_limits_dtos::RateLimitStatusDto,
            ApiResponse<rate_limits_dtos::RateLimitStatusDto>,
        )
    ),
    tags(
        (name = "conversions", description = "Image conversion to WebP, ICO, PNG and JPEG"),
    ),
    info(
        title = "Image Converter API",
        version = "0.1.0",
        description = "Convert images to WebP, ICO, PNG or JPEG",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
