use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::features::conversions::models::OutputFormat;

/// Request DTO for converting one image
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ConvertImageDto {
    /// Source image as a data URI (`data:<mime>;base64,<payload>`)
    #[schema(example = "data:image/png;base64,iVBORw0KGgo...")]
    pub image: String,
    /// Target format
    pub format: OutputFormat,
    /// Encoding quality 1-100 (default 80); ignored for `ico`
    #[validate(range(min = 1, max = 100, message = "quality must be between 1 and 100"))]
    #[schema(minimum = 1, maximum = 100, example = 80)]
    pub quality: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto(quality: Option<u32>) -> ConvertImageDto {
        ConvertImageDto {
            image: "data:image/png;base64,AAAA".to_string(),
            format: OutputFormat::Webp,
            quality,
        }
    }

    #[test]
    fn test_quality_bounds() {
        assert!(dto(None).validate().is_ok());
        assert!(dto(Some(1)).validate().is_ok());
        assert!(dto(Some(100)).validate().is_ok());
        assert!(dto(Some(0)).validate().is_err());
        assert!(dto(Some(101)).validate().is_err());
    }

    #[test]
    fn test_deserialize_without_quality() {
        let parsed: ConvertImageDto =
            serde_json::from_str(r#"{"image":"data:,","format":"ico"}"#).unwrap();
        assert_eq!(parsed.format, OutputFormat::Ico);
        assert_eq!(parsed.quality, None);
    }
}
