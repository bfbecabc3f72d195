// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use activity_match::config::Config;
use activity_match::db::MemoryDb;
use activity_match::middleware::auth::create_jwt;
use activity_match::routes::create_router;
use activity_match::services::SuggestionCatalog;
use activity_match::AppState;
use std::sync::Arc;

/// Shared state with the built-in catalog and an empty store.
#[allow(dead_code)]
pub fn test_state() -> Arc<AppState> {
    Arc::new(AppState {
        config: Config::test_default(),
        db: MemoryDb::new(),
        catalog: SuggestionCatalog::default(),
    })
}

/// Create a test app with in-memory dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let state = test_state();
    (create_router(state.clone()), state)
}

/// Create a test JWT token for `uid`.
#[allow(dead_code)]
pub fn create_test_jwt(uid: &str, signing_key: &[u8]) -> String {
    create_jwt(uid, Some(&format!("{}@example.com", uid)), Some("Tester"), signing_key, 3600)
        .expect("jwt")
}

/// Serve the reference API on an ephemeral local port.
/// Returns the base URL and the shared state.
#[allow(dead_code)]
pub async fn spawn_server() -> (String, Arc<AppState>) {
    let state = test_state();
    let app = create_router(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server");
    });

    (format!("http://{}", addr), state)
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}
