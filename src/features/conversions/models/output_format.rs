use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Target format of a conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lossy WebP
    Webp,
    /// 64×64 Windows icon
    Ico,
    /// Lossless PNG
    Png,
    /// Baseline JPEG
    Jpeg,
}

impl OutputFormat {
    /// MIME type placed in the result data URI
    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Webp => "image/webp",
            OutputFormat::Ico => "image/x-icon",
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
        }
    }

    /// File extension used when offering the result for download
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Webp => "webp",
            OutputFormat::Ico => "ico",
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpeg",
        }
    }

    /// Whether a caller-supplied quality affects the output.
    /// ICO always encodes its intermediate at full quality.
    pub fn accepts_quality(self) -> bool {
        !matches!(self, OutputFormat::Ico)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl OutputFormat {
    #[cfg(test)]
    pub const ALL: [OutputFormat; 4] = [
        OutputFormat::Webp,
        OutputFormat::Ico,
        OutputFormat::Png,
        OutputFormat::Jpeg,
    ];
}
