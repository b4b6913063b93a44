//! Bearer credential extraction.

use axum::http::{header, HeaderMap};

use crate::error::ToolError;

/// Extract the caller's bearer token from the Authorization header.
///
/// The token is opaque to the gateway; it is forwarded verbatim as the
/// access token for every Google call in the request.
pub fn bearer_token(headers: &HeaderMap) -> Result<String, ToolError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(ToolError::MissingCredential)?;

    let value = value.to_str().map_err(|_| ToolError::MalformedCredential)?;
    let token = value
        .strip_prefix("Bearer ")
        .ok_or(ToolError::MalformedCredential)?;

    if token.is_empty() {
        return Err(ToolError::MalformedCredential);
    }

    Ok(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_missing_header() {
        let headers = HeaderMap::new();
        assert_eq!(
            bearer_token(&headers).unwrap_err().kind(),
            "missing_credential"
        );
    }

    #[test]
    fn test_wrong_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Token abc123"),
        );
        assert_eq!(
            bearer_token(&headers).unwrap_err().kind(),
            "malformed_credential"
        );
    }

    #[test]
    fn test_empty_token() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(
            bearer_token(&headers).unwrap_err().kind(),
            "malformed_credential"
        );
    }

    #[test]
    fn test_valid_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer ya29.abc123"),
        );
        assert_eq!(bearer_token(&headers).unwrap(), "ya29.abc123");
    }
}
