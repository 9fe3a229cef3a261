/// Admin routes

use actix_web::{web, HttpResponse};

use crate::configuration::Platform;
use crate::error::{AppError, AuthError};
use crate::middleware::FileserverHits;
use crate::store::Stores;

/// GET /admin/metrics
pub async fn metrics(hits: web::Data<FileserverHits>) -> HttpResponse {
    let page = format!(
        r#"<html>
  <body>
    <h1>Welcome, Chirpy Admin</h1>
    <p>Chirpy has been visited {} times!</p>
  </body>
</html>"#,
        hits.get()
    );

    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(page)
}

/// POST /admin/reset
///
/// Deletes every account (sessions and chirps go with them) and zeroes the
/// hit counter. Only allowed on the `dev` platform.
pub async fn reset(
    platform: web::Data<Platform>,
    hits: web::Data<FileserverHits>,
    stores: web::Data<Stores>,
) -> Result<HttpResponse, AppError> {
    let platform = **platform;
    if platform != Platform::Dev {
        tracing::warn!(platform = ?platform, "Reset refused outside dev");
        return Err(AuthError::Forbidden.into());
    }

    stores.accounts.reset().await?;
    hits.reset();

    tracing::info!("Store and hit counter reset");
    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("Hits reset to 0 and database reset to initial state."))
}
