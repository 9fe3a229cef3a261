/// Request extractor for authenticated handlers
///
/// Handlers that take an `AuthenticatedUser` argument only run once the
/// `Authorization: Bearer` access token has been validated.

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use uuid::Uuid;

use crate::auth::service::{authenticate, AuthService};
use crate::error::{AppError, ConfigError};

/// The user id carried by a valid access token
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

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate_request(req))
    }
}

fn authenticate_request(req: &HttpRequest) -> Result<AuthenticatedUser, AppError> {
    let auth = req.app_data::<web::Data<AuthService>>().ok_or_else(|| {
        ConfigError::MissingRequired("authentication service not registered".to_string())
    })?;

    match authenticate(req.headers(), &auth.settings().secret) {
        Ok(user_id) => {
            tracing::debug!(user_id = %user_id, "Access token validated");
            Ok(AuthenticatedUser(user_id))
        }
        Err(e) => {
            tracing::warn!(path = %req.path(), error = %e, "Access token rejected");
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::generate_access_token;
    use crate::configuration::JwtSettings;
    use crate::error::AuthError;
    use crate::store::MemoryStore;
    use actix_web::http::header::AUTHORIZATION;
    use actix_web::test::TestRequest;
    use chrono::Duration;
    use std::sync::Arc;

    const SECRET: &str = "extractor-test-secret";

    fn service() -> web::Data<AuthService> {
        let store = Arc::new(MemoryStore::new());
        web::Data::new(AuthService::new(
            store.clone(),
            store,
            JwtSettings::new(SECRET),
        ))
    }

    #[actix_web::test]
    async fn test_valid_token_yields_user() {
        let user_id = Uuid::new_v4();
        let token = generate_access_token(&user_id, SECRET, Duration::minutes(5)).unwrap();
        let (req, mut payload) = TestRequest::default()
            .app_data(service())
            .insert_header((AUTHORIZATION, format!("Bearer {}", token)))
            .to_http_parts();

        let user = AuthenticatedUser::from_request(&req, &mut payload)
            .await
            .unwrap();
        assert_eq!(user.id(), user_id);
    }

    #[actix_web::test]
    async fn test_missing_header_is_rejected() {
        let (req, mut payload) = TestRequest::default()
            .app_data(service())
            .to_http_parts();

        let err = AuthenticatedUser::from_request(&req, &mut payload)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Auth(AuthError::MissingCredential)));
    }

    #[actix_web::test]
    async fn test_token_signed_elsewhere_is_rejected() {
        let token = generate_access_token(&Uuid::new_v4(), "other-secret", Duration::minutes(5))
            .unwrap();
        let (req, mut payload) = TestRequest::default()
            .app_data(service())
            .insert_header((AUTHORIZATION, format!("Bearer {}", token)))
            .to_http_parts();

        let err = AuthenticatedUser::from_request(&req, &mut payload)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Auth(AuthError::InvalidToken)));
    }
}
