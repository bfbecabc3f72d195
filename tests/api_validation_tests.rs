// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API input validation tests.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

mod common;

async fn post_activity(body: serde_json::Value) -> StatusCode {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("alice", &state.config.jwt_signing_key);

    app.oneshot(
        Request::builder()
            .method("POST")
            .uri("/api/activities")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
    .status()
}

#[tokio::test]
async fn test_empty_title_rejected() {
    let status = post_activity(serde_json::json!({"title": "", "description": "x"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_title_too_long_rejected() {
    let status = post_activity(serde_json::json!({"title": "a".repeat(201)})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_image_url_rejected() {
    let status = post_activity(serde_json::json!({
        "title": "Kayak",
        "image_url": "not-a-url"
    }))
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_valid_activity_created() {
    let status = post_activity(serde_json::json!({
        "title": "Kayak",
        "description": "Paddle the bay",
        "image_url": "https://img.example/kayak.png"
    }))
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_user_uid_too_long() {
    let (app, _) = common::create_test_app();
    let long_uid = "u".repeat(129);

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/suggestions?user_uid={}", long_uid))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
