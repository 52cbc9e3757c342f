/// Password Hashing and Verification
///
/// Passwords are stored as bcrypt hashes. The encoded string carries the
/// algorithm version, cost and salt, so verification needs nothing else.

use std::fmt;

use bcrypt::{hash, verify, BcryptError};

/// Work factor for new hashes. Cost 10 keeps a verify in the tens of
/// milliseconds on current hardware.
pub const HASH_COST: u32 = 10;

/// Password hashing failures
#[derive(Debug, Clone, PartialEq)]
pub enum PasswordError {
    /// The hasher itself failed (e.g. the salt source)
    Hashing(String),
    /// The stored hash is not a valid bcrypt encoding
    MalformedHash(String),
}

impl fmt::Display for PasswordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PasswordError::Hashing(msg) => write!(f, "Password hashing failed: {}", msg),
            PasswordError::MalformedHash(msg) => write!(f, "Malformed password hash: {}", msg),
        }
    }
}

impl std::error::Error for PasswordError {}

/// Hash a password using bcrypt with a fresh random salt
///
/// Two calls with the same password produce different strings.
///
/// # Errors
/// Returns `PasswordError::Hashing` if bcrypt fails. Password content never
/// causes an error.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    hash(password, HASH_COST).map_err(|e| PasswordError::Hashing(e.to_string()))
}

/// Verify a password against its stored hash
///
/// A non-matching password is `Ok(false)`, not an error.
///
/// # Errors
/// Returns `PasswordError::MalformedHash` if `hash` cannot be parsed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    verify(password, hash).map_err(|e| match e {
        BcryptError::InvalidHash(_)
        | BcryptError::InvalidPrefix(_)
        | BcryptError::InvalidCost(_)
        | BcryptError::InvalidBase64(_) => PasswordError::MalformedHash(e.to_string()),
        other => PasswordError::Hashing(other.to_string()),
    })
}
