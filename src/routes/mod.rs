// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers for the reference Activity API.

pub mod api;

use crate::middleware::auth::require_auth;
use crate::AppState;
use axum::extract::{Request, State};
use axum::http::{header, HeaderValue, Method};
use axum::{middleware, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// Cards in the suggestion catalog
    pub suggestions: usize,
    /// Users with a saved list
    pub users: usize,
    /// Saved activities across all users
    pub saved_activities: usize,
}

async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let (users, saved_activities) = state.db.totals();
    Json(HealthResponse {
        status: "ok".to_string(),
        suggestions: state.catalog.cards().len(),
        users,
        saved_activities,
    })
}

/// Only the configured frontend may call the API from a browser.
fn cors_layer(frontend_url: &str) -> CorsLayer {
    let origins: Vec<HeaderValue> = match HeaderValue::from_str(frontend_url.trim_end_matches('/')) {
        Ok(origin) => vec![origin],
        Err(_) => {
            tracing::warn!(frontend_url = %frontend_url, "FRONTEND_URL is not a valid origin; CORS disabled");
            Vec::new()
        }
    };

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    let protected = api::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let trace = TraceLayer::new_for_http()
        .make_span_with(|request: &Request| {
            tracing::info_span!(
                "activity_api",
                method = %request.method(),
                path = %request.uri().path(),
            )
        })
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(health_check))
        .merge(api::public_routes())
        .merge(protected)
        .layer(cors_layer(&state.config.frontend_url))
        .layer(trace)
        .with_state(state)
}
