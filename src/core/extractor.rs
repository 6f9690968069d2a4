use axum::{
    body::Body,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Request},
    http::{request::Parts, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use std::convert::Infallible;

use crate::core::error::AppError;
use crate::shared::constants::{HEADER_FORWARDED_FOR, HEADER_REAL_IP, UNKNOWN_CLIENT_ID};

/// Custom JSON extractor that provides consistent error responses
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppJsonRejection;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(value) => Ok(Self(value.0)),
            Err(rejection) => Err(AppJsonRejection(rejection)),
        }
    }
}

pub struct AppJsonRejection(JsonRejection);

impl IntoResponse for AppJsonRejection {
    fn into_response(self) -> Response {
        let message = match self.0 {
            JsonRejection::JsonDataError(err) => format!("Invalid JSON data: {}", err),
            JsonRejection::JsonSyntaxError(err) => format!("Invalid JSON syntax: {}", err),
            JsonRejection::MissingJsonContentType(err) => {
                format!("Missing JSON content type: {}", err)
            }
            JsonRejection::BytesRejection(err) => format!("Failed to read request body: {}", err),
            _ => "Failed to parse JSON body".to_string(),
        };

        AppError::BadRequest(message).into_response()
    }
}

/// Best-effort client identity taken from proxy headers.
///
/// Not verified: any client can set these headers, so the identity only
/// scopes rate limiting and must never be used for authorization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity(pub String);

impl ClientIdentity {
    /// `x-forwarded-for` (first hop), then `x-real-ip`, then the shared "unknown" bucket
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        let forwarded_for = header(HEADER_FORWARDED_FOR)
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        let id = forwarded_for
            .or_else(|| header(HEADER_REAL_IP))
            .unwrap_or(UNKNOWN_CLIENT_ID);

        Self(id.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S> FromRequestParts<S> for ClientIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn test_forwarded_for_wins() {
        let id = ClientIdentity::from_headers(&headers(&[
            ("x-forwarded-for", "203.0.113.7"),
            ("x-real-ip", "198.51.100.1"),
        ]));
        assert_eq!(id.as_str(), "203.0.113.7");
    }

    #[test]
    fn test_forwarded_for_uses_first_hop() {
        let id = ClientIdentity::from_headers(&headers(&[(
            "x-forwarded-for",
            " 203.0.113.7 , 10.0.0.2, 10.0.0.3",
        )]));
        assert_eq!(id.as_str(), "203.0.113.7");
    }

    #[test]
    fn test_falls_back_to_real_ip() {
        let id = ClientIdentity::from_headers(&headers(&[("x-real-ip", "198.51.100.1")]));
        assert_eq!(id.as_str(), "198.51.100.1");
    }

    #[test]
    fn test_empty_forwarded_for_falls_back() {
        let id = ClientIdentity::from_headers(&headers(&[
            ("x-forwarded-for", "  "),
            ("x-real-ip", "198.51.100.1"),
        ]));
        assert_eq!(id.as_str(), "198.51.100.1");

        let id = ClientIdentity::from_headers(&headers(&[
            ("x-forwarded-for", ", 10.0.0.2"),
            ("x-real-ip", "198.51.100.1"),
        ]));
        assert_eq!(id.as_str(), "198.51.100.1");
    }

    #[test]
    fn test_no_headers_is_unknown() {
        let id = ClientIdentity::from_headers(&HeaderMap::new());
        assert_eq!(id.as_str(), UNKNOWN_CLIENT_ID);

        let id = ClientIdentity::from_headers(&headers(&[("x-real-ip", "")]));
        assert_eq!(id.as_str(), UNKNOWN_CLIENT_ID);
    }
}
