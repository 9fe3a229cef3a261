/// Payment provider webhooks

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::{constant_time_eq, extract_api_key};
use crate::configuration::PolkaSettings;
use crate::error::{AppError, AuthError, DatabaseError, ValidationError};
use crate::store::Stores;

const USER_UPGRADED: &str = "user.upgraded";

#[derive(Deserialize)]
pub struct PolkaEvent {
    pub event: String,
    pub data: PolkaEventData,
}

#[derive(Deserialize)]
pub struct PolkaEventData {
    pub user_id: Uuid,
}

/// POST /api/polka/webhooks
///
/// The API key is checked before the body is parsed. Events other than
/// `user.upgraded` are acknowledged and ignored.
///
/// # Errors
/// - 401: missing or wrong `Authorization: ApiKey` header
/// - 400: body is not a valid event
/// - 404: the event names an unknown user
pub async fn polka_webhook(
    req: HttpRequest,
    body: web::Bytes,
    polka: web::Data<PolkaSettings>,
    stores: web::Data<Stores>,
) -> Result<HttpResponse, AppError> {
    let key = extract_api_key(req.headers()).map_err(|_| AuthError::Unauthorized)?;
    if !constant_time_eq(key.as_bytes(), polka.api_key.as_bytes()) {
        tracing::warn!("Webhook rejected: wrong API key");
        return Err(AuthError::Unauthorized.into());
    }

    let event: PolkaEvent = serde_json::from_slice(&body)
        .map_err(|e| ValidationError::MalformedBody(e.to_string()))?;

    if event.event != USER_UPGRADED {
        tracing::debug!(event = %event.event, "Ignoring webhook event");
        return Ok(HttpResponse::NoContent().finish());
    }

    let user_id = event.data.user_id;
    stores
        .accounts
        .upgrade_to_red(user_id)
        .await?
        .ok_or_else(|| DatabaseError::NotFound(format!("user {}", user_id)))?;

    tracing::info!(user_id = %user_id, "Account upgraded to Chirpy Red");
    Ok(HttpResponse::NoContent().finish())
}
