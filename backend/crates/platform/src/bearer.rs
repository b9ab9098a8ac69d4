//! `Authorization: Bearer` header parsing

use http::{HeaderMap, header};
use thiserror::Error;

/// Expected scheme, matched case-sensitively
pub const BEARER_SCHEME: &str = "Bearer";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BearerError {
    /// No `Authorization` header, or an empty one
    #[error("authorization header missing")]
    Missing,

    /// Header present but not exactly `Bearer <token>`
    #[error("authorization header malformed")]
    Malformed,
}

/// Extract the token from `Authorization: Bearer <token>`.
///
/// The value must split on single spaces into exactly two parts, the first
/// being `Bearer` and the second non-empty. Anything else is [`BearerError::Malformed`].
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, BearerError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Err(BearerError::Missing);
    };

    if value.is_empty() {
        return Err(BearerError::Missing);
    }

    let value = value.to_str().map_err(|_| BearerError::Malformed)?;

    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(BEARER_SCHEME), Some(token), None) if !token.is_empty() => Ok(token),
        _ => Err(BearerError::Malformed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn headers_with(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_valid_bearer() {
        let headers = headers_with("Bearer abc123");
        assert_eq!(extract_bearer_token(&headers), Ok("abc123"));
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(
            extract_bearer_token(&HeaderMap::new()),
            Err(BearerError::Missing)
        );
        assert_eq!(
            extract_bearer_token(&headers_with("")),
            Err(BearerError::Missing)
        );
    }

    #[test]
    fn test_wrong_scheme() {
        for value in ["Token abc", "bearer abc", "Basic dXNlcjpwYXNz"] {
            assert_eq!(
                extract_bearer_token(&headers_with(value)),
                Err(BearerError::Malformed),
                "{value}"
            );
        }
    }

    #[test]
    fn test_wrong_part_count() {
        for value in ["Bearer", "Bearer a b", "Bearer  abc", "abc"] {
            assert_eq!(
                extract_bearer_token(&headers_with(value)),
                Err(BearerError::Malformed),
                "{value}"
            );
        }
    }

    #[test]
    fn test_empty_token() {
        assert_eq!(
            extract_bearer_token(&headers_with("Bearer ")),
            Err(BearerError::Malformed)
        );
    }
}
