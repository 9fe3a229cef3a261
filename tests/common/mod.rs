//! Shared helpers for the integration tests.
//! Every test gets its own server on a random port, backed by an in-memory
//! store or by a throwaway Postgres database.
#![allow(dead_code)]

use chirpy::configuration::{
    get_configuration, ApplicationSettings, DatabaseSettings, JwtSettings, Platform,
    PolkaSettings, Settings,
};
use chirpy::startup::run;
use chirpy::store::{MemoryStore, PgStore, Stores};
use chirpy::telemetry::init_telemetry;
use lazy_static::lazy_static;
use serde_json::{json, Value};
use sqlx::{Connection, Executor, PgConnection, PgPool};
use std::net::TcpListener;

pub const JWT_SECRET: &str = "integration-test-secret-for-signing";
pub const POLKA_KEY: &str = "f271c81ff7084ee5b99a5091b42d486e";
pub const PASSWORD: &str = "04234Kiwi";

lazy_static! {
    // Set TEST_LOG to see server logs while debugging a test
    static ref TRACING: () = {
        if std::env::var("TEST_LOG").is_ok() {
            init_telemetry();
        }
    };
}

pub struct TestApp {
    pub address: String,
}

/// A registered and logged-in account
pub struct TestUser {
    pub id: String,
    pub email: String,
    pub token: String,
    pub refresh_token: String,
}

fn test_settings(platform: Platform) -> Settings {
    Settings {
        database: DatabaseSettings {
            username: "unused".to_string(),
            password: "unused".to_string(),
            port: 5432,
            host: "localhost".to_string(),
            database_name: "unused".to_string(),
        },
        application: ApplicationSettings {
            host: "127.0.0.1".to_string(),
            port: 0,
            platform,
        },
        jwt: JwtSettings::new(JWT_SECRET),
        polka: PolkaSettings {
            api_key: POLKA_KEY.to_string(),
        },
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_on(Platform::Dev).await
}

pub async fn spawn_app_on(platform: Platform) -> TestApp {
    spawn_app_with(Stores::from_backend(MemoryStore::new()), platform)
}

/// Server backed by a freshly created and migrated Postgres database.
/// Connection details come from `configuration.yaml` / `APP_DATABASE__*`.
pub async fn spawn_pg_app() -> (TestApp, PgPool) {
    let pool = configure_database().await;
    let app = spawn_app_with(Stores::from_backend(PgStore::new(pool.clone())), Platform::Dev);
    (app, pool)
}

fn spawn_app_with(stores: Stores, platform: Platform) -> TestApp {
    lazy_static::initialize(&TRACING);

    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let server = run(listener, stores, test_settings(platform)).expect("Failed to bind address");
    let _ = tokio::spawn(server);

    TestApp { address }
}

/// Create a uniquely named database and run the migrations on it
pub async fn configure_database() -> PgPool {
    let mut config = get_configuration()
        .expect("Failed to read configuration.")
        .database;
    config.database_name = uuid::Uuid::new_v4().to_string();

    let mut connection = PgConnection::connect(&config.connection_string_without_db())
        .await
        .expect("Failed to connect to Postgres");
    connection
        .execute(&*format!(r#"CREATE DATABASE "{}";"#, config.database_name))
        .await
        .expect("Failed to create database.");

    let connection_pool = PgPool::connect(&config.connection_string())
        .await
        .expect("Failed to connect to Postgres.");
    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("Failed to migrate the database.");
    connection_pool
}

impl TestApp {
    pub async fn register(&self, email: &str, password: &str) -> reqwest::Response {
        reqwest::Client::new()
            .post(&format!("{}/api/users", &self.address))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn login(&self, body: Value) -> reqwest::Response {
        reqwest::Client::new()
            .post(&format!("{}/api/login", &self.address))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn create_user(&self, email: &str) -> TestUser {
        let response = self.register(email, PASSWORD).await;
        assert_eq!(201, response.status().as_u16());

        let response = self
            .login(json!({ "email": email, "password": PASSWORD }))
            .await;
        assert_eq!(200, response.status().as_u16());

        let body: Value = response.json().await.expect("Failed to parse response");
        TestUser {
            id: body["id"].as_str().unwrap().to_string(),
            email: email.to_string(),
            token: body["token"].as_str().unwrap().to_string(),
            refresh_token: body["refresh_token"].as_str().unwrap().to_string(),
        }
    }

    /// POST to a path with `Authorization: Bearer <token>` and no body
    pub async fn post_with_bearer(&self, path: &str, token: &str) -> reqwest::Response {
        reqwest::Client::new()
            .post(&format!("{}{}", &self.address, path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_chirp(&self, token: &str, body: &str) -> reqwest::Response {
        reqwest::Client::new()
            .post(&format!("{}/api/chirps", &self.address))
            .bearer_auth(token)
            .json(&json!({ "body": body }))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_json(&self, path: &str) -> (u16, Value) {
        let response = reqwest::Client::new()
            .get(&format!("{}{}", &self.address, path))
            .send()
            .await
            .expect("Failed to execute request.");
        let status = response.status().as_u16();
        let body = response.json().await.unwrap_or(Value::Null);
        (status, body)
    }
}
