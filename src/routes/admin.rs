/// Admin Routes

use actix_web::{http::header::ContentType, web, HttpResponse};

use crate::configuration::ApplicationSettings;
use crate::error::AppError;
use crate::metrics::HitCounter;
use crate::store::Store;

/// GET /admin/metrics
pub async fn metrics(counter: web::Data<HitCounter>) -> HttpResponse {
    let html = format!(
        r#"<html>
  <body>
    <h1>Welcome, Chirpy Admin</h1>
    <p>Chirpy has been visited {} times!</p>
  </body>
</html>"#,
        counter.hits()
    );

    HttpResponse::Ok().content_type(ContentType::html()).body(html)
}

/// POST /admin/reset
///
/// Only on the `dev` platform: zeroes the hit counter and deletes every
/// user (chirps and refresh tokens go with them).
pub async fn reset(
    app: web::Data<ApplicationSettings>,
    counter: web::Data<HitCounter>,
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, AppError> {
    if !app.is_dev() {
        return Err(AppError::Forbidden);
    }

    counter.reset();
    store.reset_users().await?;

    tracing::warn!("All users deleted by admin reset");

    Ok(HttpResponse::Ok().finish())
}
