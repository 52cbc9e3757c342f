/// Chirp Routes

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::chirps::validate_chirp;
use crate::domain::Chirp;
use crate::error::{AppError, ErrorContext, ValidationError};
use crate::extractors::AuthenticatedUser;
use crate::store::Store;

#[derive(Deserialize)]
pub struct ChirpRequest {
    pub body: String,
}

#[derive(Serialize)]
pub struct CleanedChirp {
    pub cleaned_body: String,
}

fn parse_chirp_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::Validation(ValidationError::InvalidFormat("chirp id")))
}

/// POST /api/chirps
///
/// Requires a valid access token. The body is censored before storage.
pub async fn create_chirp(
    user: AuthenticatedUser,
    form: web::Json<ChirpRequest>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("create_chirp").with_user_id(user.id().to_string());

    let body = validate_chirp(&form.body)?;
    let chirp = store.create_chirp(&Chirp::new(user.id(), body)).await?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = %user.id(),
        chirp_id = %chirp.id,
        "Chirp created"
    );

    Ok(HttpResponse::Created().json(chirp))
}

/// GET /api/chirps
pub async fn list_chirps(store: web::Data<dyn Store>) -> Result<HttpResponse, AppError> {
    let chirps = store.list_chirps().await?;
    Ok(HttpResponse::Ok().json(chirps))
}

/// GET /api/chirps/{chirp_id}
pub async fn get_chirp(
    path: web::Path<String>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    let chirp_id = parse_chirp_id(&path)?;

    let chirp = store
        .find_chirp(chirp_id)
        .await?
        .ok_or(AppError::NotFound("Chirp"))?;

    Ok(HttpResponse::Ok().json(chirp))
}

/// DELETE /api/chirps/{chirp_id}
///
/// # Errors
/// - 401: Missing or invalid access token
/// - 403: Chirp belongs to someone else
/// - 404: No such chirp
pub async fn delete_chirp(
    user: AuthenticatedUser,
    path: web::Path<String>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    let chirp_id = parse_chirp_id(&path)?;

    let chirp = store
        .find_chirp(chirp_id)
        .await?
        .ok_or(AppError::NotFound("Chirp"))?;

    if chirp.user_id != user.id() {
        return Err(AppError::Forbidden);
    }

    if !store.delete_chirp(chirp_id, user.id()).await? {
        return Err(AppError::NotFound("Chirp"));
    }

    tracing::info!(user_id = %user.id(), chirp_id = %chirp_id, "Chirp deleted");

    Ok(HttpResponse::NoContent().finish())
}

/// POST /api/validate_chirp
pub async fn validate(form: web::Json<ChirpRequest>) -> Result<HttpResponse, AppError> {
    let cleaned_body = validate_chirp(&form.body)?;
    Ok(HttpResponse::Ok().json(CleanedChirp { cleaned_body }))
}
