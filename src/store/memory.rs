//! In-memory `Store` used by the test-suite and by the binary when no
//! database is configured. State is lost on restart.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::Store;
use crate::auth::RefreshToken;
use crate::domain::{Chirp, User};
use crate::error::StoreError;

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    refresh_tokens: HashMap<String, RefreshToken>,
    chirps: Vec<Chirp>,
}

#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Connection("in-memory store lock poisoned".to_string()))
    }
}

fn email_taken(inner: &Inner, email: &str, except: Option<Uuid>) -> bool {
    inner
        .users
        .values()
        .any(|u| u.email == email && Some(u.id) != except)
}

#[async_trait]
impl Store for InMemoryStore {
    async fn create_user(&self, user: &User) -> Result<User, StoreError> {
        let mut inner = self.lock()?;
        if email_taken(&inner, &user.email, None) {
            return Err(StoreError::UniqueViolation("users_email_key".to_string()));
        }
        inner.users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let inner = self.lock()?;
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn update_credentials(
        &self,
        id: Uuid,
        email: &str,
        hashed_password: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<(User, u64)>, StoreError> {
        let mut inner = self.lock()?;
        if email_taken(&inner, email, Some(id)) {
            return Err(StoreError::UniqueViolation("users_email_key".to_string()));
        }

        let user = match inner.users.get_mut(&id) {
            Some(user) => {
                user.email = email.to_string();
                user.hashed_password = hashed_password.to_string();
                user.updated_at = at;
                user.clone()
            }
            None => return Ok(None),
        };

        let mut revoked = 0;
        for record in inner.refresh_tokens.values_mut() {
            if record.user_id == id && record.revoked_at.is_none() {
                record.revoke_at(at);
                revoked += 1;
            }
        }

        Ok(Some((user, revoked)))
    }

    async fn upgrade_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let mut inner = self.lock()?;
        Ok(inner.users.get_mut(&id).map(|user| {
            user.is_chirpy_red = true;
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn reset_users(&self) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        inner.users.clear();
        inner.refresh_tokens.clear();
        inner.chirps.clear();
        Ok(())
    }

    async fn insert_refresh_token(&self, record: &RefreshToken) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        if inner.refresh_tokens.contains_key(&record.token) {
            return Err(StoreError::UniqueViolation("refresh_tokens_pkey".to_string()));
        }
        if !inner.users.contains_key(&record.user_id) {
            return Err(StoreError::Query("refresh token owner does not exist".to_string()));
        }
        inner.refresh_tokens.insert(record.token.clone(), record.clone());
        Ok(())
    }

    async fn find_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, StoreError> {
        let inner = self.lock()?;
        Ok(inner.refresh_tokens.get(token).cloned())
    }

    async fn revoke_refresh_token(&self, token: &str, at: DateTime<Utc>) -> Result<bool, StoreError> {
        let mut inner = self.lock()?;
        match inner.refresh_tokens.get_mut(token) {
            Some(record) => {
                record.revoke_at(at);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn create_chirp(&self, chirp: &Chirp) -> Result<Chirp, StoreError> {
        let mut inner = self.lock()?;
        if !inner.users.contains_key(&chirp.user_id) {
            return Err(StoreError::Query("chirp author does not exist".to_string()));
        }
        inner.chirps.push(chirp.clone());
        Ok(chirp.clone())
    }

    async fn list_chirps(&self) -> Result<Vec<Chirp>, StoreError> {
        let inner = self.lock()?;
        let mut chirps = inner.chirps.clone();
        chirps.sort_by_key(|c| c.created_at);
        Ok(chirps)
    }

    async fn find_chirp(&self, id: Uuid) -> Result<Option<Chirp>, StoreError> {
        let inner = self.lock()?;
        Ok(inner.chirps.iter().find(|c| c.id == id).cloned())
    }

    async fn delete_chirp(&self, id: Uuid, user_id: Uuid) -> Result<bool, StoreError> {
        let mut inner = self.lock()?;
        let before = inner.chirps.len();
        inner.chirps.retain(|c| !(c.id == id && c.user_id == user_id));
        Ok(inner.chirps.len() != before)
    }
}
