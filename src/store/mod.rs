/// Record store
///
/// The only shared state in the service. Everything the session layer
/// knows about users and refresh tokens comes through `Store`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::auth::RefreshToken;
use crate::domain::{Chirp, User};
use crate::error::StoreError;

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait Store: Send + Sync {
    // --- users ---

    /// Fails with `UniqueViolation` if the email is taken
    async fn create_user(&self, user: &User) -> Result<User, StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    /// Replace email and password hash and revoke every live refresh token
    /// of the user, all or nothing. Returns the updated user and the number
    /// of tokens revoked, or `None` if no user has `id`.
    async fn update_credentials(
        &self,
        id: Uuid,
        email: &str,
        hashed_password: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<(User, u64)>, StoreError>;
    async fn upgrade_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    /// Delete every user together with their chirps and refresh tokens
    async fn reset_users(&self) -> Result<(), StoreError>;

    // --- refresh tokens ---

    async fn insert_refresh_token(&self, record: &RefreshToken) -> Result<(), StoreError>;
    async fn find_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, StoreError>;
    /// Set `revoked_at` unless already set. Returns `false` if the token
    /// does not exist.
    async fn revoke_refresh_token(&self, token: &str, at: DateTime<Utc>) -> Result<bool, StoreError>;

    /// Owner of a token that is still usable
    async fn find_user_by_refresh_token(&self, token: &str) -> Result<Option<Uuid>, StoreError> {
        Ok(self
            .find_refresh_token(token)
            .await?
            .filter(|record| record.is_usable())
            .map(|record| record.user_id))
    }

    // --- chirps ---

    async fn create_chirp(&self, chirp: &Chirp) -> Result<Chirp, StoreError>;
    /// All chirps, oldest first
    async fn list_chirps(&self) -> Result<Vec<Chirp>, StoreError>;
    async fn find_chirp(&self, id: Uuid) -> Result<Option<Chirp>, StoreError>;
    /// Returns `false` if no chirp `id` by `user_id` existed
    async fn delete_chirp(&self, id: Uuid, user_id: Uuid) -> Result<bool, StoreError>;
}
