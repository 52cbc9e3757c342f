/// Session lifecycle
///
/// Anonymous -> Authenticated(access, refresh) -> Refreshed(new access) -> Revoked
///
/// Every operation takes the signing configuration explicitly and keeps
/// no state of its own; the store is the only point of synchronisation.
/// Failures keep their precise `AuthError` kind for logging. The HTTP
/// layer collapses them into one unauthorized response.

use actix_web::http::header::HeaderMap;
use chrono::Utc;
use uuid::Uuid;

use crate::auth::{
    generate_access_token, generate_refresh_token, get_bearer_token, validate_access_token,
    verify_password, RefreshToken,
};
use crate::configuration::JwtSettings;
use crate::domain::UserProfile;
use crate::error::AuthError;
use crate::store::Store;

/// Cost-10 bcrypt hash checked against when the email is unknown
const UNKNOWN_USER_HASH: &str = "$2a$10$N9qo8uLOickgx2ZMRZoMyeIjZAgcfl7p92ldGxad68LJZdL17lhWy";

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: UserProfile,
    pub access_token: String,
    pub refresh_token: String,
}

/// Verify email and password, then issue an access token and a persisted
/// refresh token.
///
/// An unknown email and a wrong password both fail with
/// `InvalidCredentials` so that callers cannot discover which accounts exist.
pub async fn login(
    store: &dyn Store,
    jwt: &JwtSettings,
    email: &str,
    password: &str,
) -> Result<LoginOutcome, AuthError> {
    let user = match store.find_user_by_email(email).await? {
        Some(user) => user,
        None => {
            // pay the same bcrypt cost as a real mismatch
            let _ = verify_password(password, UNKNOWN_USER_HASH);
            tracing::info!(cause = %AuthError::NotFound, "Login rejected");
            return Err(AuthError::InvalidCredentials);
        }
    };

    if !verify_password(password, &user.hashed_password)? {
        tracing::info!(user_id = %user.id, "Login rejected: password mismatch");
        return Err(AuthError::InvalidCredentials);
    }

    let access_token = generate_access_token(user.id, jwt)?;
    let record = RefreshToken::issue(generate_refresh_token(), user.id, jwt.refresh_token_ttl());
    store.insert_refresh_token(&record).await?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(LoginOutcome {
        user: user.profile(),
        access_token,
        refresh_token: record.token,
    })
}

/// Exchange the bearer refresh token for a new access token
///
/// The refresh token itself is left untouched: no rotation and no sliding
/// expiry. Unknown, revoked and expired tokens are indistinguishable to
/// the caller.
pub async fn refresh(
    store: &dyn Store,
    jwt: &JwtSettings,
    headers: &HeaderMap,
) -> Result<String, AuthError> {
    let token = get_bearer_token(headers)?;

    let user_id = store
        .find_user_by_refresh_token(&token)
        .await?
        .ok_or(AuthError::Unauthorized)?;

    let access_token = generate_access_token(user_id, jwt)?;
    tracing::debug!(user_id = %user_id, "Access token refreshed");

    Ok(access_token)
}

/// Revoke the bearer refresh token
///
/// Revoking an already revoked token succeeds; an unknown token fails.
pub async fn revoke(store: &dyn Store, headers: &HeaderMap) -> Result<(), AuthError> {
    let token = get_bearer_token(headers)?;

    if !store.revoke_refresh_token(&token, Utc::now()).await? {
        return Err(AuthError::Unauthorized);
    }

    Ok(())
}

/// Resolve the user behind the bearer access token
pub fn authenticate(jwt: &JwtSettings, headers: &HeaderMap) -> Result<Uuid, AuthError> {
    let token = get_bearer_token(headers)?;
    Ok(validate_access_token(&token, jwt)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{decode_access_token, hash_password, issue_access_token};
    use crate::domain::User;
    use crate::store::InMemoryStore;
    use actix_web::http::header::{HeaderValue, AUTHORIZATION};
    use chrono::Duration;

    fn jwt_settings() -> JwtSettings {
        JwtSettings {
            secret: "test-secret-key-at-least-32-characters-long".to_string(),
            access_token_expiry: 3600,
            refresh_token_expiry: 5_184_000,
            issuer: "chirpy".to_string(),
        }
    }

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );
        headers
    }

    async fn store_with_user(email: &str, password: &str) -> (InMemoryStore, User) {
        let store = InMemoryStore::new();
        let hash = hash_password(password).unwrap();
        let user = store.create_user(&User::new(email.to_string(), hash)).await.unwrap();
        (store, user)
    }

    #[tokio::test]
    async fn test_login_issues_both_tokens() {
        let jwt = jwt_settings();
        let (store, user) = store_with_user("a@b.com", "pw123").await;

        let outcome = login(&store, &jwt, "a@b.com", "pw123").await.expect("login failed");

        assert_eq!(outcome.user.id, user.id);
        assert_eq!(outcome.refresh_token.len(), 64);
        assert!(outcome.refresh_token.chars().all(|c| c.is_ascii_hexdigit()));

        let claims = decode_access_token(&outcome.access_token, &jwt.secret, &jwt.issuer).unwrap();
        assert_eq!(claims.exp - claims.iat, 3600);
        assert_eq!(claims.user_id(), Some(user.id));

        let record = store.find_refresh_token(&outcome.refresh_token).await.unwrap().unwrap();
        assert_eq!(record.user_id, user.id);
        assert_eq!(record.expires_at - record.created_at, Duration::days(60));
        assert!(record.revoked_at.is_none());
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let jwt = jwt_settings();
        let (store, _) = store_with_user("a@b.com", "pw123").await;

        let wrong_password = login(&store, &jwt, "a@b.com", "pw124").await.unwrap_err();
        let unknown_email = login(&store, &jwt, "x@b.com", "pw123").await.unwrap_err();

        assert_eq!(wrong_password, AuthError::InvalidCredentials);
        assert_eq!(unknown_email, AuthError::InvalidCredentials);
    }

    #[tokio::test]
    async fn test_login_with_corrupt_hash() {
        let jwt = jwt_settings();
        let store = InMemoryStore::new();
        store
            .create_user(&User::new("a@b.com".to_string(), "corrupt".to_string()))
            .await
            .unwrap();

        let err = login(&store, &jwt, "a@b.com", "pw123").await.unwrap_err();

        assert_eq!(err, AuthError::MalformedHash);
        assert!(err.is_infrastructure());
    }

    #[tokio::test]
    async fn test_refresh_then_revoke() {
        let jwt = jwt_settings();
        let (store, user) = store_with_user("a@b.com", "pw123").await;
        let outcome = login(&store, &jwt, "a@b.com", "pw123").await.unwrap();
        let headers = bearer(&outcome.refresh_token);

        let access = refresh(&store, &jwt, &headers).await.expect("refresh failed");
        assert_eq!(validate_access_token(&access, &jwt), Ok(user.id));

        // refresh does not consume the token
        assert!(refresh(&store, &jwt, &headers).await.is_ok());

        revoke(&store, &headers).await.expect("revoke failed");
        assert_eq!(refresh(&store, &jwt, &headers).await, Err(AuthError::Unauthorized));

        // revoking twice is harmless
        assert!(revoke(&store, &headers).await.is_ok());
    }

    #[tokio::test]
    async fn test_refresh_with_unknown_token() {
        let jwt = jwt_settings();
        let store = InMemoryStore::new();

        let result = refresh(&store, &jwt, &bearer(&generate_refresh_token())).await;

        assert_eq!(result, Err(AuthError::Unauthorized));
    }

    #[tokio::test]
    async fn test_refresh_with_expired_token() {
        let jwt = jwt_settings();
        let (store, user) = store_with_user("a@b.com", "pw123").await;
        let record = RefreshToken::issue(generate_refresh_token(), user.id, Duration::zero());
        store.insert_refresh_token(&record).await.unwrap();

        let result = refresh(&store, &jwt, &bearer(&record.token)).await;

        assert_eq!(result, Err(AuthError::Unauthorized));
    }

    #[tokio::test]
    async fn test_refresh_without_header() {
        let jwt = jwt_settings();
        let store = InMemoryStore::new();

        let result = refresh(&store, &jwt, &HeaderMap::new()).await;

        assert_eq!(result, Err(AuthError::MissingHeader));
    }

    #[tokio::test]
    async fn test_revoke_unknown_token() {
        let store = InMemoryStore::new();

        let result = revoke(&store, &bearer("deadbeef")).await;

        assert_eq!(result, Err(AuthError::Unauthorized));
    }

    #[test]
    fn test_unknown_user_hash_is_checked() {
        assert_eq!(verify_password("pw123", UNKNOWN_USER_HASH), Ok(false));
        assert!(UNKNOWN_USER_HASH.starts_with("$2a$10$"));
    }

    #[tokio::test]
    async fn test_refresh_issues_fresh_access_token() {
        let jwt = jwt_settings();
        let (store, _) = store_with_user("a@b.com", "pw123").await;
        let outcome = login(&store, &jwt, "a@b.com", "pw123").await.unwrap();
        let issued = decode_access_token(&outcome.access_token, &jwt.secret, &jwt.issuer).unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(1100)).await;

        let access = refresh(&store, &jwt, &bearer(&outcome.refresh_token)).await.unwrap();
        let refreshed = decode_access_token(&access, &jwt.secret, &jwt.issuer).unwrap();

        assert!(refreshed.iat > issued.iat);
        assert_eq!(refreshed.exp - refreshed.iat, 3600);
        assert_eq!(refreshed.sub, issued.sub);
    }

    #[test]
    fn test_authenticate() {
        let jwt = jwt_settings();
        let user_id = Uuid::new_v4();
        let token = generate_access_token(user_id, &jwt).unwrap();

        assert_eq!(authenticate(&jwt, &bearer(&token)), Ok(user_id));
    }

    #[test]
    fn test_authenticate_failure_kinds() {
        let jwt = jwt_settings();
        let expired =
            issue_access_token(Uuid::new_v4(), &jwt.secret, &jwt.issuer, Duration::zero()).unwrap();

        assert_eq!(authenticate(&jwt, &HeaderMap::new()), Err(AuthError::MissingHeader));
        assert_eq!(authenticate(&jwt, &bearer("not-a-jwt")), Err(AuthError::MalformedToken));
        assert_eq!(authenticate(&jwt, &bearer(&expired)), Err(AuthError::Expired));

        let mut basic = HeaderMap::new();
        basic.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(authenticate(&jwt, &basic), Err(AuthError::MalformedHeader));
    }

    #[test]
    fn test_refresh_token_is_not_an_access_token() {
        let jwt = jwt_settings();

        let result = authenticate(&jwt, &bearer(&generate_refresh_token()));

        assert_eq!(result, Err(AuthError::MalformedToken));
    }
}
