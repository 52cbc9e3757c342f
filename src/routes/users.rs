/// User Routes
///
/// Account creation and credential updates.

use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;

use crate::auth::hash_password;
use crate::domain::User;
use crate::error::{AppError, ErrorContext};
use crate::extractors::AuthenticatedUser;
use crate::store::Store;
use crate::validators::{is_valid_email, is_valid_password};

/// Create or update request
#[derive(Deserialize)]
pub struct UserRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/users
///
/// # Errors
/// - 400: Invalid email or empty password
/// - 409: Email already registered
pub async fn create_user(
    form: web::Json<UserRequest>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_registration");

    let email = is_valid_email(&form.email)?;
    is_valid_password(&form.password)?;
    let hashed_password = hash_password(&form.password)?;

    let user = store.create_user(&User::new(email, hashed_password)).await?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = %user.id,
        "User registered"
    );

    Ok(HttpResponse::Created().json(user.profile()))
}

/// PUT /api/users
///
/// Requires a valid access token. The update and the revocation of every
/// refresh token the user holds happen together or not at all.
///
/// # Errors
/// - 400: Invalid email or empty password
/// - 401: Missing or invalid access token
/// - 404: The token's user no longer exists
/// - 409: Email taken by another user
pub async fn update_user(
    user: AuthenticatedUser,
    form: web::Json<UserRequest>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_update").with_user_id(user.id().to_string());

    let email = is_valid_email(&form.email)?;
    is_valid_password(&form.password)?;
    let hashed_password = hash_password(&form.password)?;

    let (updated, revoked) = store
        .update_credentials(user.id(), &email, &hashed_password, Utc::now())
        .await
        .map_err(|e| context.log_error(e))?
        .ok_or(AppError::NotFound("User"))?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = %updated.id,
        revoked_tokens = revoked,
        "User credentials updated"
    );

    Ok(HttpResponse::Ok().json(updated.profile()))
}
