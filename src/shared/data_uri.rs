//! Data URI helpers
//!
//! Images travel over the API as `data:<mime>;base64,<payload>` strings. Only
//! the payload (everything after the first comma) is meaningful for decoding;
//! the header is kept for diagnostics but never trusted for format detection.

use base64::prelude::*;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataUriError {
    #[error("image must be a data URI of the form '<header>,<base64-payload>'")]
    MissingSeparator,

    #[error("image payload is not valid base64: {0}")]
    InvalidBase64(String),
}

/// A data URI split into its header and decoded payload
#[derive(Debug, Clone)]
pub struct DecodedDataUri {
    /// Everything before the first comma, e.g. `data:image/png;base64`
    pub header: String,
    pub bytes: Vec<u8>,
}

impl DecodedDataUri {
    /// MIME type declared in the header, if the header follows the `data:` scheme
    pub fn declared_mime(&self) -> Option<&str> {
        let rest = self.header.strip_prefix("data:")?;
        let mime = rest.split(';').next().unwrap_or("");
        if mime.is_empty() {
            None
        } else {
            Some(mime)
        }
    }
}

/// Split `input` at its first comma and base64-decode the remainder
pub fn parse_data_uri(input: &str) -> Result<DecodedDataUri, DataUriError> {
    let (header, payload) = input
        .split_once(',')
        .ok_or(DataUriError::MissingSeparator)?;

    let bytes = BASE64_STANDARD
        .decode(payload.trim())
        .map_err(|e| DataUriError::InvalidBase64(e.to_string()))?;

    Ok(DecodedDataUri {
        header: header.to_string(),
        bytes,
    })
}

/// Render `bytes` as a `data:<mime>;base64,<payload>` string
pub fn encode_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, BASE64_STANDARD.encode(bytes))
}
