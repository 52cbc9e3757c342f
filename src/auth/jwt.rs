/// JWT Token Generation and Validation
///
/// Access tokens are HS256-signed JWTs: three base64url segments joined by
/// `.`, with the signature covering header and payload. They are validated
/// without touching the store, which is why their lifetime is short.

use std::fmt;

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::auth::claims::Claims;
use crate::configuration::JwtSettings;

/// Access token failures
#[derive(Debug, Clone, PartialEq)]
pub enum TokenError {
    /// Not three well-formed segments, or the payload is not our claim set
    Malformed(String),
    /// Signature does not match header and payload under our secret
    SignatureMismatch,
    Expired,
    /// Correctly signed but issued for another issuer tag
    WrongIssuer,
    /// Signing failed while issuing
    Encoding(String),
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenError::Malformed(msg) => write!(f, "Malformed token: {}", msg),
            TokenError::SignatureMismatch => write!(f, "Token signature mismatch"),
            TokenError::Expired => write!(f, "Token has expired"),
            TokenError::WrongIssuer => write!(f, "Token issuer mismatch"),
            TokenError::Encoding(msg) => write!(f, "Token generation failed: {}", msg),
        }
    }
}

impl std::error::Error for TokenError {}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                TokenError::SignatureMismatch
            }
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidIssuer => TokenError::WrongIssuer,
            _ => TokenError::Malformed(err.to_string()),
        }
    }
}

/// Sign a token for `user_id` that expires `ttl` from now
///
/// # Errors
/// Returns `TokenError::Encoding` if signing fails
pub fn issue_access_token(
    user_id: Uuid,
    secret: &str,
    issuer: &str,
    ttl: Duration,
) -> Result<String, TokenError> {
    let claims = Claims::new(user_id, ttl, issuer.to_string());

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| TokenError::Encoding(e.to_string()))
}

/// Generate a new access token for a user with the configured lifetime
pub fn generate_access_token(user_id: Uuid, config: &JwtSettings) -> Result<String, TokenError> {
    issue_access_token(user_id, &config.secret, &config.issuer, config.access_token_ttl())
}

/// Check signature, issuer and expiry, and return the claims
///
/// Expiry is checked here rather than by `jsonwebtoken` so that the rule
/// is exactly `now >= exp` with no leeway.
pub fn decode_access_token(token: &str, secret: &str, issuer: &str) -> Result<Claims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);
    validation.set_issuer(&[issuer]);

    let claims = decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)?;

    if claims.is_expired_at(Utc::now().timestamp()) {
        return Err(TokenError::Expired);
    }

    Ok(claims)
}

/// Validate an access token and return the authenticated user ID
///
/// # Errors
/// `Malformed` for anything that is not one of our tokens (including a
/// non-UUID subject), `SignatureMismatch` on tampering or a foreign secret,
/// `Expired` once the lifetime has elapsed.
pub fn validate_access_token(token: &str, config: &JwtSettings) -> Result<Uuid, TokenError> {
    let claims = decode_access_token(token, &config.secret, &config.issuer)?;

    claims
        .user_id()
        .ok_or_else(|| TokenError::Malformed("subject is not a user id".to_string()))
}
