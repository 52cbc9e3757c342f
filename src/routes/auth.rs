/// Authentication Routes
///
/// Login, access token refresh and refresh token revocation.
///
/// # Security Notes
/// - Every credential or token failure returns the same 401 body
/// - The precise cause is logged with the request id only

use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::configuration::JwtSettings;
use crate::domain::UserProfile;
use crate::error::{AppError, ErrorContext};
use crate::session;
use crate::store::Store;

/// User login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response: the public profile plus both tokens
#[derive(Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: UserProfile,
    pub token: String,
    pub refresh_token: String,
}

/// Token refresh response
#[derive(Serialize)]
pub struct RefreshResponse {
    pub token: String,
}

/// POST /api/login
///
/// # Errors
/// - 401: Unknown email or wrong password (same response for both)
/// - 500: Store or hashing failure
pub async fn login(
    form: web::Json<LoginRequest>,
    store: web::Data<dyn Store>,
    jwt_config: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_login");

    let outcome = session::login(
        store.get_ref(),
        jwt_config.get_ref(),
        form.email.trim(),
        &form.password,
    )
    .await
    .map_err(|e| context.log_error(e))?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = %outcome.user.id,
        "Login succeeded"
    );

    Ok(HttpResponse::Ok().json(LoginResponse {
        user: outcome.user,
        token: outcome.access_token,
        refresh_token: outcome.refresh_token,
    }))
}

/// POST /api/refresh
///
/// Requires `Authorization: Bearer <refresh_token>`. The refresh token is
/// not rotated.
///
/// # Errors
/// - 401: Missing header, or unknown, revoked or expired token
pub async fn refresh(
    req: HttpRequest,
    store: web::Data<dyn Store>,
    jwt_config: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("token_refresh");

    let token = session::refresh(store.get_ref(), jwt_config.get_ref(), req.headers())
        .await
        .map_err(|e| context.log_error(e))?;

    Ok(HttpResponse::Ok().json(RefreshResponse { token }))
}

/// POST /api/revoke
///
/// Requires `Authorization: Bearer <refresh_token>`.
///
/// # Errors
/// - 401: Missing header or unknown token
pub async fn revoke(req: HttpRequest, store: web::Data<dyn Store>) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("token_revoke");

    session::revoke(store.get_ref(), req.headers())
        .await
        .map_err(|e| context.log_error(e))?;

    tracing::info!(request_id = %context.request_id, "Refresh token revoked");

    Ok(HttpResponse::NoContent().finish())
}
