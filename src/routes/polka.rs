/// Polka payment webhook
///
/// Authenticated with `Authorization: ApiKey <key>`, a credential for the
/// payment provider rather than for a user session.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::extractors::PolkaCaller;
use crate::store::Store;

const USER_UPGRADED: &str = "user.upgraded";

#[derive(Deserialize)]
pub struct WebhookData {
    pub user_id: Uuid,
}

#[derive(Deserialize)]
pub struct WebhookRequest {
    pub event: String,
    pub data: WebhookData,
}

/// POST /api/polka/webhooks
///
/// # Errors
/// - 401: Missing, malformed or wrong API key, checked before the body
/// - 400: Body is not a webhook event
/// - 404: `user.upgraded` for an unknown user
pub async fn webhook(
    _caller: PolkaCaller,
    form: web::Json<WebhookRequest>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    if form.event != USER_UPGRADED {
        tracing::debug!(event = %form.event, "Ignoring webhook event");
        return Ok(HttpResponse::NoContent().finish());
    }

    store
        .upgrade_user(form.data.user_id)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    tracing::info!(user_id = %form.data.user_id, "User upgraded to Chirpy Red");

    Ok(HttpResponse::NoContent().finish())
}
