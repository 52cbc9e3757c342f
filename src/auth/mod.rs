/// Authentication module
///
/// Password hashing, access token signing/validation, refresh token
/// values and authorization header parsing. None of it touches the store.

mod claims;
mod extract;
mod jwt;
mod password;
mod refresh_token;

pub use claims::Claims;
pub use extract::{get_api_key, get_bearer_token, HeaderError};
pub use jwt::{
    decode_access_token, generate_access_token, issue_access_token, validate_access_token,
    TokenError,
};
pub use password::{hash_password, verify_password, PasswordError, HASH_COST};
pub use refresh_token::{generate_refresh_token, hash_token, RefreshToken, REFRESH_TOKEN_BYTES};
