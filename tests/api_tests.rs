mod common;

use common::{InMemoryRepo, test_app};
use geopark_portal::MockStorageService;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::net::TcpListener;

pub struct TestApp {
    pub address: String,
    pub repo: Arc<InMemoryRepo>,
}

async fn spawn_app() -> TestApp {
    let repo = Arc::new(InMemoryRepo::new());
    let router = test_app(repo.clone(), Arc::new(MockStorageService::new()));

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestApp { address, repo }
}

#[tokio::test]
async fn test_health_check() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/health", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = spawn_app().await;

    let doc: Value = reqwest::get(format!("{}/api-docs/openapi.json", app.address))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let paths = doc["paths"].as_object().unwrap();
    assert!(paths.contains_key("/api/wisata"));
    assert!(paths.contains_key("/api/admin/stats"));
    assert!(paths.contains_key("/api/ulasan"));

    let schemas = doc["components"]["schemas"].as_object().unwrap();
    assert!(schemas.contains_key("Pengelola"));
    assert!(!schemas.contains_key("Admin"));
}

#[tokio::test]
async fn test_register_login_me_flow() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/auth/register", app.address))
        .json(&json!({ "nama": "Sari", "email": "sari@mail.id", "password": "sandi-rahasia" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);
    assert_eq!(app.repo.pengguna_count(), 1);

    let login: Value = client
        .post(format!("{}/api/auth/login", app.address))
        .json(&json!({ "email": "sari@mail.id", "password": "sandi-rahasia" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let token = login["data"]["token"].as_str().unwrap();

    let me: Value = client
        .get(format!("{}/api/me", app.address))
        .bearer_auth(token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(me["data"]["email"], "sari@mail.id");
    assert_eq!(me["data"]["role"], "pengguna");
}

#[tokio::test]
async fn test_wrong_password_is_unauthorized_json() {
    let app = spawn_app().await;
    app.repo.seed_pengguna("sari@mail.id");

    let response = reqwest::Client::new()
        .post(format!("{}/api/auth/login", app.address))
        .json(&json!({ "email": "sari@mail.id", "password": "tebakan-salah" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 401);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Invalid email or password");
}
