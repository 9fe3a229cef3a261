/// Account routes
///
/// Registration, credential updates and login.

use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{AuthService, AuthenticatedUser, LoginOutcome};
use crate::error::AppError;
use crate::store::User;
use crate::validators::{is_valid_email, is_valid_password};

/// Body of registration and credential update requests
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Requested access token lifetime; clamped to the configured ceiling
    #[serde(default)]
    pub expires_in_seconds: Option<i64>,
}

/// Public view of an account. Tokens are only present on login.
#[derive(Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub email: String,
    pub is_chirpy_red: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            created_at: user.created_at,
            updated_at: user.updated_at,
            email: user.email,
            is_chirpy_red: user.is_chirpy_red,
            token: None,
            refresh_token: None,
        }
    }
}

impl From<LoginOutcome> for UserResponse {
    fn from(outcome: LoginOutcome) -> Self {
        Self {
            token: Some(outcome.access_token),
            refresh_token: Some(outcome.refresh_token),
            ..UserResponse::from(outcome.user)
        }
    }
}

/// POST /api/users
///
/// # Errors
/// - 400: invalid email, empty password or password over 72 bytes
/// - 409: email already registered
pub async fn register(
    form: web::Json<CredentialsRequest>,
    auth: web::Data<AuthService>,
) -> Result<HttpResponse, AppError> {
    let email = is_valid_email(&form.email)?;
    is_valid_password(&form.password)?;

    let user = auth.register(&email, &form.password).await?;

    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// PUT /api/users
///
/// Replaces the caller's email and password.
pub async fn update_user(
    user: AuthenticatedUser,
    form: web::Json<CredentialsRequest>,
    auth: web::Data<AuthService>,
) -> Result<HttpResponse, AppError> {
    let email = is_valid_email(&form.email)?;
    is_valid_password(&form.password)?;

    let updated = auth
        .update_credentials(user.id(), &email, &form.password)
        .await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(updated)))
}

/// POST /api/login
///
/// Unknown emails and wrong passwords get the same 401.
pub async fn login(
    form: web::Json<LoginRequest>,
    auth: web::Data<AuthService>,
) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();
    let outcome = auth
        .login(form.email.trim(), &form.password, form.expires_in_seconds)
        .await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(outcome)))
}
