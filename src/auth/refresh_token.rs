/// Refresh Token Management
///
/// Refresh tokens are opaque, long-lived and checked against the store on
/// every use:
/// - 32 bytes from the OS CSPRNG, hex-encoded (64 characters)
/// - usable while not revoked and not expired
/// - never rotated on refresh; they live until expiry or explicit revocation
///
/// Persistence belongs to the store; this module only produces values and
/// decides usability.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Number of random bytes in a refresh token
pub const REFRESH_TOKEN_BYTES: usize = 32;

/// A persisted refresh token record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshToken {
    pub token: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshToken {
    /// Build the record for a freshly generated token owned by `user_id`
    pub fn issue(token: String, user_id: Uuid, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            token,
            user_id,
            created_at: now,
            updated_at: now,
            expires_at: now + ttl,
            revoked_at: None,
        }
    }

    /// Usable for exchange iff never revoked and `now < expires_at`.
    pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        self.revoked_at.is_none() && now < self.expires_at
    }

    pub fn is_usable(&self) -> bool {
        self.is_usable_at(Utc::now())
    }

    /// Mark revoked. The first revocation time is kept.
    pub fn revoke_at(&mut self, now: DateTime<Utc>) {
        if self.revoked_at.is_none() {
            self.revoked_at = Some(now);
            self.updated_at = now;
        }
    }
}

/// Generate a new cryptographically secure refresh token
pub fn generate_refresh_token() -> String {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// SHA-256 digest of a token, used as the database lookup key so that
/// plaintext tokens are never stored.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_refresh_token() {
        let token = generate_refresh_token();

        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_tokens_are_unique() {
        let tokens: std::collections::HashSet<String> =
            (0..1000).map(|_| generate_refresh_token()).collect();

        assert_eq!(tokens.len(), 1000);
    }

    #[test]
    fn test_issue_sets_expiry() {
        let record = RefreshToken::issue(generate_refresh_token(), Uuid::new_v4(), Duration::days(60));

        assert_eq!(record.expires_at - record.created_at, Duration::days(60));
        assert!(record.revoked_at.is_none());
        assert!(record.is_usable());
    }

    #[test]
    fn test_usability_window() {
        let record = RefreshToken::issue(generate_refresh_token(), Uuid::new_v4(), Duration::days(60));

        assert!(record.is_usable_at(record.expires_at - Duration::seconds(1)));
        assert!(!record.is_usable_at(record.expires_at));
        assert!(!record.is_usable_at(record.expires_at + Duration::days(1)));
    }

    #[test]
    fn test_revocation_is_monotonic() {
        let mut record =
            RefreshToken::issue(generate_refresh_token(), Uuid::new_v4(), Duration::days(60));
        let first = Utc::now();

        record.revoke_at(first);
        record.revoke_at(first + Duration::hours(1));

        assert_eq!(record.revoked_at, Some(first));
        assert!(!record.is_usable_at(record.created_at));
    }

    #[test]
    fn test_token_hashing() {
        let token = generate_refresh_token();
        let hash1 = hash_token(&token);
        let hash2 = hash_token(&token);

        assert_eq!(hash1, hash2);
        assert_ne!(token, hash1);
        assert_eq!(hash1.len(), 64);
        assert_ne!(hash1, hash_token(&generate_refresh_token()));
    }
}
