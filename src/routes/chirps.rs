/// Chirp routes
///
/// Reads are public. Creating needs an access token and deleting needs the
/// token of the chirp's author.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{authorize_mutation, AuthenticatedUser};
use crate::error::{AppError, DatabaseError};
use crate::store::Stores;
use crate::validators::validate_chirp_body;

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChirpRequest {
    pub body: String,
}

#[derive(Serialize)]
pub struct ValidateChirpResponse {
    pub cleaned_body: String,
}

/// Raw query parameters. Only `sort=desc` changes the order; any other
/// value lists oldest first.
#[derive(Deserialize)]
pub struct ListChirpsQuery {
    pub author_id: Option<String>,
    pub sort: Option<String>,
}

impl ListChirpsQuery {
    /// An absent or empty `author_id` means every author. One that is not
    /// a UUID names no author at all and is a 404.
    fn author(&self) -> Result<Option<Uuid>, AppError> {
        match self.author_id.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => Uuid::parse_str(raw)
                .map(Some)
                .map_err(|_| DatabaseError::NotFound(format!("author {}", raw)).into()),
        }
    }

    fn descending(&self) -> bool {
        self.sort.as_deref() == Some("desc")
    }
}

fn chirp_not_found(id: Uuid) -> AppError {
    DatabaseError::NotFound(format!("chirp {}", id)).into()
}

/// GET /api/chirps?author_id=&sort=asc|desc
///
/// # Errors
/// - 404: `author_id` is not a UUID
pub async fn list_chirps(
    query: web::Query<ListChirpsQuery>,
    stores: web::Data<Stores>,
) -> Result<HttpResponse, AppError> {
    let mut chirps = stores.chirps.list(query.author()?).await?;
    if query.descending() {
        chirps.reverse();
    }

    Ok(HttpResponse::Ok().json(chirps))
}

/// GET /api/chirps/{chirp_id}
pub async fn get_chirp(
    path: web::Path<Uuid>,
    stores: web::Data<Stores>,
) -> Result<HttpResponse, AppError> {
    let chirp_id = path.into_inner();
    let chirp = stores
        .chirps
        .find_by_id(chirp_id)
        .await?
        .ok_or_else(|| chirp_not_found(chirp_id))?;

    Ok(HttpResponse::Ok().json(chirp))
}

/// POST /api/chirps
///
/// # Errors
/// - 400: body longer than 140 characters
/// - 401: missing or invalid access token
pub async fn create_chirp(
    user: AuthenticatedUser,
    form: web::Json<ChirpRequest>,
    stores: web::Data<Stores>,
) -> Result<HttpResponse, AppError> {
    let body = validate_chirp_body(&form.body)?;
    let chirp = stores.chirps.create(&body, user.id()).await?;

    tracing::info!(user_id = %user.id(), chirp_id = %chirp.id, "Chirp created");
    Ok(HttpResponse::Created().json(chirp))
}

/// DELETE /api/chirps/{chirp_id}
///
/// # Errors
/// - 401: missing or invalid access token
/// - 403: caller is not the author
/// - 404: no such chirp
pub async fn delete_chirp(
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    stores: web::Data<Stores>,
) -> Result<HttpResponse, AppError> {
    let chirp_id = path.into_inner();
    let chirp = stores
        .chirps
        .find_by_id(chirp_id)
        .await?
        .ok_or_else(|| chirp_not_found(chirp_id))?;

    authorize_mutation(user.id(), chirp.user_id)?;

    // Scoped to the owner so a concurrent delete cannot remove someone else's chirp
    stores
        .chirps
        .delete(chirp_id, user.id())
        .await?
        .ok_or_else(|| chirp_not_found(chirp_id))?;

    tracing::info!(user_id = %user.id(), chirp_id = %chirp_id, "Chirp deleted");
    Ok(HttpResponse::NoContent().finish())
}

/// POST /api/validate_chirp
pub async fn validate_chirp(form: web::Json<ChirpRequest>) -> Result<HttpResponse, AppError> {
    let cleaned_body = validate_chirp_body(&form.body)?;
    Ok(HttpResponse::Ok().json(ValidateChirpResponse { cleaned_body }))
}
