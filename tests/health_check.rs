//! Integration tests for the liveness probe and the static file server

mod common;

use common::spawn_app;

#[tokio::test]
async fn healthz_returns_ok_as_plain_text() {
    let app = spawn_app().await;

    let response = reqwest::Client::new()
        .get(&format!("{}/api/healthz", &app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
    let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/plain"));
    assert_eq!(response.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn healthz_rejects_other_methods() {
    let app = spawn_app().await;

    let response = reqwest::Client::new()
        .post(&format!("{}/api/healthz", &app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn app_serves_index_page() {
    let app = spawn_app().await;

    let response = reqwest::Client::new()
        .get(&format!("{}/app/", &app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(200, response.status().as_u16());
    assert!(response.text().await.unwrap().contains("Welcome to Chirpy"));
}
