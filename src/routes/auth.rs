/// Session routes
///
/// Both endpoints take the refresh token from `Authorization: Bearer`.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Serialize;

use crate::auth::{extract_bearer, AuthService};
use crate::error::AppError;

#[derive(Serialize)]
pub struct RefreshResponse {
    pub token: String,
}

/// POST /api/refresh
///
/// Mints a new access token. The refresh token stays valid.
///
/// # Errors
/// - 401: missing, unknown, expired or revoked refresh token
pub async fn refresh(
    req: HttpRequest,
    auth: web::Data<AuthService>,
) -> Result<HttpResponse, AppError> {
    let refresh_token = extract_bearer(req.headers())?;
    let token = auth.refresh(&refresh_token).await?;

    Ok(HttpResponse::Ok().json(RefreshResponse { token }))
}

/// POST /api/revoke
pub async fn revoke(
    req: HttpRequest,
    auth: web::Data<AuthService>,
) -> Result<HttpResponse, AppError> {
    let refresh_token = extract_bearer(req.headers())?;
    auth.revoke(&refresh_token).await?;

    Ok(HttpResponse::NoContent().finish())
}
