//! Drives the HTTP surface over a real socket.

use frontend_lib::adapters::{MemoryIdentityProvider, MemoryProfileStore};
use frontend_lib::config::SessionConfig;
use frontend_lib::session::SessionService;
use frontend_lib::web::{self, auth::AuthResultResponse, auth::ProfileResponse, auth::SessionResponse, AppState};
use reqwest::{redirect::Policy, Client, StatusCode};
use serde_json::json;
use std::sync::Arc;

/// Serves the router on an ephemeral port and returns its base URL.
async fn spawn_app() -> String {
    let session = Arc::new(SessionService::start(
        Arc::new(MemoryIdentityProvider::default()),
        Arc::new(MemoryProfileStore::new()),
        SessionConfig::default(),
    ));
    let app = web::router(Arc::new(AppState::new(session)));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("Server error: {}", e);
        }
    });

    format!("http://{}", addr)
}

fn client() -> Client {
    Client::builder().redirect(Policy::none()).build().unwrap()
}

#[tokio::test]
async fn protected_route_redirects_until_signed_in() {
    let base_url = spawn_app().await;
    let client = client();

    let response = client.get(format!("{}/profile", base_url)).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get("location").and_then(|v| v.to_str().ok()),
        Some("/auth/sign-in")
    );

    let response = client.get(format!("{}/auth/sign-in", base_url)).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn sign_up_update_and_sign_out() {
    let base_url = spawn_app().await;
    let client = client();

    let response = client
        .post(format!("{}/auth/sign-up", base_url))
        .json(&json!({ "email": "a@x.com", "password": "pw123456", "name": "Alice" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: AuthResultResponse = response.json().await.unwrap();
    assert!(body.success);
    assert_eq!(body.user.as_ref().map(|u| u.name.as_str()), Some("Alice"));

    let response = client.get(format!("{}/profile", base_url)).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let profile: ProfileResponse = response.json().await.unwrap();
    assert_eq!(profile.email, "a@x.com");

    let response = client
        .patch(format!("{}/profile", base_url))
        .json(&json!({ "photo_url": "https://x/y.jpg" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let profile: ProfileResponse = response.json().await.unwrap();
    assert_eq!(profile.photo_url.as_deref(), Some("https://x/y.jpg"));
    assert_eq!(profile.name, "Alice");

    let response = client
        .post(format!("{}/auth/sign-out", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let session: SessionResponse = client
        .get(format!("{}/auth/session", base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(!session.is_authenticated);
    assert!(session.user.is_none());

    let response = client.get(format!("{}/profile", base_url)).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let base_url = spawn_app().await;
    let client = client();

    client
        .post(format!("{}/auth/sign-up", base_url))
        .json(&json!({ "email": "a@x.com", "password": "pw123456", "name": "Alice" }))
        .send()
        .await
        .unwrap();
    client
        .post(format!("{}/auth/sign-out", base_url))
        .send()
        .await
        .unwrap();

    let response = client
        .post(format!("{}/auth/sign-in", base_url))
        .json(&json!({ "email": "a@x.com", "password": "wrong-password" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: AuthResultResponse = response.json().await.unwrap();
    assert!(!body.success);
    assert!(!body.error.unwrap_or_default().is_empty());

    let session: SessionResponse = client
        .get(format!("{}/auth/session", base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(!session.is_authenticated);
}
