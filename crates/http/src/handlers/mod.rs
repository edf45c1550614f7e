pub mod dreams;
pub mod interpret;
pub mod users;

use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;

/// Extract the bearer token from the Authorization header, if present.
/// Validation belongs to the identity provider, not this layer.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_extracted() {
        assert_eq!(bearer_token(&headers_with("Bearer abc123")), Some("abc123"));
    }

    #[test]
    fn test_missing_header_is_none() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_wrong_scheme_is_none() {
        assert_eq!(bearer_token(&headers_with("Basic dXNlcg==")), None);
    }

    #[test]
    fn test_empty_token_is_none() {
        assert_eq!(bearer_token(&headers_with("Bearer ")), None);
    }
}
