/// Request extractors for protected routes
///
/// `AuthenticatedUser` validates the bearer access token before the
/// handler runs. `PolkaCaller` checks the webhook API key. Any failure is
/// rejected with the generic 401. Put them first in a handler's arguments
/// so that they run before the body is parsed.

use std::future::{ready, Ready};

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use uuid::Uuid;

use crate::auth::get_api_key;
use crate::configuration::{JwtSettings, PolkaSettings};
use crate::error::{AppError, AuthError};
use crate::session;

/// The user behind a valid access token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub Uuid);

impl AuthenticatedUser {
    pub fn id(&self) -> Uuid {
        self.0
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = match req.app_data::<web::Data<JwtSettings>>() {
            Some(jwt) => session::authenticate(jwt, req.headers())
                .map(AuthenticatedUser)
                .map_err(AppError::from),
            None => Err(AppError::Internal("JWT settings are not registered".to_string())),
        };

        if let Ok(user) = &result {
            tracing::debug!(user_id = %user.0, "Access token validated");
        }

        ready(result)
    }
}

/// A request carrying the Polka webhook key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolkaCaller;

impl FromRequest for PolkaCaller {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = match req.app_data::<web::Data<PolkaSettings>>() {
            Some(polka) => match get_api_key(req.headers()) {
                Ok(key) if key == polka.api_key => Ok(PolkaCaller),
                Ok(_) => Err(AuthError::Unauthorized.into()),
                Err(e) => Err(AuthError::from(e).into()),
            },
            None => Err(AppError::Internal("Polka settings are not registered".to_string())),
        };

        ready(result)
    }
}
