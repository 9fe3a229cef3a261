use actix_files as fs;
use actix_web::dev::Server;
use actix_web::error::JsonPayloadError;
use actix_web::{web, App, HttpRequest, HttpServer};
use std::net::TcpListener;

use crate::auth::AuthService;
use crate::configuration::Settings;
use crate::error::{AppError, ValidationError};
use crate::middleware::{FileserverHits, HitCounter, RequestLogger};
use crate::routes::{
    create_chirp, delete_chirp, get_chirp, health_check, list_chirps, login, metrics,
    polka_webhook, refresh, register, reset, revoke, update_user, validate_chirp,
};
use crate::store::Stores;

/// Directory served under `/app`
const PUBLIC_DIR: &str = "./public";

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::Validation(ValidationError::MalformedBody(err.to_string())).into()
}

pub fn run(
    listener: TcpListener,
    stores: Stores,
    settings: Settings,
) -> Result<Server, std::io::Error> {
    let auth = web::Data::new(AuthService::new(
        stores.accounts.clone(),
        stores.sessions.clone(),
        settings.jwt.clone(),
    ));
    let stores = web::Data::new(stores);
    let platform = web::Data::new(settings.application.platform);
    let polka = web::Data::new(settings.polka.clone());
    let hits = FileserverHits::new();
    let hits_data = web::Data::new(hits.clone());

    tracing::info!(platform = ?settings.application.platform, "Building application");

    let server = HttpServer::new(move || {
        App::new()
            // Global middleware
            .wrap(RequestLogger)

            // Extractor configuration
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))

            // Shared state
            .app_data(auth.clone())
            .app_data(stores.clone())
            .app_data(platform.clone())
            .app_data(polka.clone())
            .app_data(hits_data.clone())

            // Authenticated handlers take an `AuthenticatedUser` argument
            .service(
                web::scope("/api")
                    .route("/healthz", web::get().to(health_check))
                    .route("/users", web::post().to(register))
                    .route("/users", web::put().to(update_user))
                    .route("/login", web::post().to(login))
                    .route("/refresh", web::post().to(refresh))
                    .route("/revoke", web::post().to(revoke))
                    .route("/chirps", web::get().to(list_chirps))
                    .route("/chirps", web::post().to(create_chirp))
                    .route("/chirps/{chirp_id}", web::get().to(get_chirp))
                    .route("/chirps/{chirp_id}", web::delete().to(delete_chirp))
                    .route("/validate_chirp", web::post().to(validate_chirp))
                    .route("/polka/webhooks", web::post().to(polka_webhook)),
            )
            .service(
                web::scope("/admin")
                    .route("/metrics", web::get().to(metrics))
                    .route("/reset", web::post().to(reset)),
            )

            // Static file serving, counted
            .service(
                web::scope("/app")
                    .wrap(HitCounter::new(hits.clone()))
                    .service(fs::Files::new("", PUBLIC_DIR).index_file("index.html")),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
