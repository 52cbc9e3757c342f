/// Authorization header parsing
///
/// Pulls a credential out of `Authorization` without caring what it is
/// used for. `Bearer` carries access or refresh tokens depending on the
/// endpoint; `ApiKey` carries the payment provider's webhook key.

use std::fmt;

use actix_web::http::header::{HeaderMap, AUTHORIZATION};

const BEARER_PREFIX: &str = "Bearer ";
const API_KEY_PREFIX: &str = "ApiKey ";

/// Header parsing failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderError {
    Missing,
    /// Wrong scheme, not valid visible ASCII, or an empty credential
    Malformed,
}

impl fmt::Display for HeaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderError::Missing => write!(f, "no authorization header included in request"),
            HeaderError::Malformed => write!(f, "malformed authorization header"),
        }
    }
}

impl std::error::Error for HeaderError {}

/// Extract the token from `Authorization: Bearer <token>`
pub fn get_bearer_token(headers: &HeaderMap) -> Result<String, HeaderError> {
    get_credential(headers, BEARER_PREFIX)
}

/// Extract the key from `Authorization: ApiKey <key>`
pub fn get_api_key(headers: &HeaderMap) -> Result<String, HeaderError> {
    get_credential(headers, API_KEY_PREFIX)
}

fn get_credential(headers: &HeaderMap, prefix: &str) -> Result<String, HeaderError> {
    let value = headers.get(AUTHORIZATION).ok_or(HeaderError::Missing)?;
    let value = value.to_str().map_err(|_| HeaderError::Malformed)?;

    // Scheme match is case-sensitive
    let credential = value
        .strip_prefix(prefix)
        .map(str::trim)
        .ok_or(HeaderError::Malformed)?;

    if credential.is_empty() {
        return Err(HeaderError::Malformed);
    }

    Ok(credential.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(get_bearer_token(&headers_with("Bearer xyz")), Ok("xyz".to_string()));
    }

    #[test]
    fn test_bearer_token_is_trimmed() {
        assert_eq!(get_bearer_token(&headers_with("Bearer   abc  ")), Ok("abc".to_string()));
    }

    #[test]
    fn test_wrong_scheme() {
        assert_eq!(get_bearer_token(&headers_with("Basic xyz")), Err(HeaderError::Malformed));
        assert_eq!(get_bearer_token(&headers_with("bearer xyz")), Err(HeaderError::Malformed));
        assert_eq!(get_bearer_token(&headers_with("ApiKey xyz")), Err(HeaderError::Malformed));
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(get_bearer_token(&HeaderMap::new()), Err(HeaderError::Missing));
        assert_eq!(get_api_key(&HeaderMap::new()), Err(HeaderError::Missing));
    }

    #[test]
    fn test_empty_credential() {
        assert_eq!(get_bearer_token(&headers_with("Bearer ")), Err(HeaderError::Malformed));
        assert_eq!(get_bearer_token(&headers_with("Bearer    ")), Err(HeaderError::Malformed));
    }

    #[test]
    fn test_non_ascii_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer \xfftoken").unwrap(),
        );

        assert_eq!(get_bearer_token(&headers), Err(HeaderError::Malformed));
    }

    #[test]
    fn test_api_key() {
        assert_eq!(get_api_key(&headers_with("ApiKey f271c81ff7084ee5b99a5091b42d486e")),
            Ok("f271c81ff7084ee5b99a5091b42d486e".to_string()));
        assert_eq!(get_api_key(&headers_with("Bearer abc")), Err(HeaderError::Malformed));
    }
}
