// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity API routes: suggestions, saved activities and the identity echo.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{BackendGreeting, CandidateCard, CompletionUpdate, NewActivity, SavedActivity};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

const MAX_USER_UID_LEN: usize = 128;

/// Routes that work without a session.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/suggestions", get(get_suggestions))
}

/// Routes behind the JWT middleware (applied in routes/mod.rs).
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/activities", get(list_activities).post(create_activity))
        .route(
            "/api/activities/{id}",
            put(update_activity).delete(delete_activity),
        )
        .route("/api/data", get(get_data))
}

// ─── Suggestions ─────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SuggestionsQuery {
    pub user_uid: Option<String>,
}

/// Suggested activities, optionally personalized by user id.
async fn get_suggestions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SuggestionsQuery>,
) -> Result<Json<Vec<CandidateCard>>> {
    if let Some(uid) = &params.user_uid {
        if uid.len() > MAX_USER_UID_LEN {
            return Err(AppError::BadRequest("user_uid too long".to_string()));
        }
    }

    Ok(Json(state.catalog.ranked_for(params.user_uid.as_deref())))
}

// ─── Saved Activities ────────────────────────────────────────

async fn list_activities(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Json<Vec<SavedActivity>> {
    Json(state.db.list_activities(&user.uid))
}

async fn create_activity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<NewActivity>,
) -> Result<(StatusCode, Json<SavedActivity>)> {
    body.validate()?;

    let created = state.db.create_activity(&user.uid, body);
    tracing::info!(uid = %user.uid, activity_id = %created.id, "Activity saved");

    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_activity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(body): Json<CompletionUpdate>,
) -> Result<Json<SavedActivity>> {
    let updated = state
        .db
        .set_completed(&user.uid, &id, body.is_completed)
        .ok_or_else(|| AppError::NotFound(format!("Activity {}", id)))?;

    tracing::info!(
        uid = %user.uid,
        activity_id = %id,
        is_completed = body.is_completed,
        "Activity completion updated"
    );
    Ok(Json(updated))
}

async fn delete_activity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    if !state.db.delete_activity(&user.uid, &id) {
        return Err(AppError::NotFound(format!("Activity {}", id)));
    }

    tracing::info!(uid = %user.uid, activity_id = %id, "Activity deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ─── Identity Echo ───────────────────────────────────────────

/// Echo the verified caller back (connectivity check for the profile panel).
async fn get_data(Extension(user): Extension<AuthUser>) -> Json<BackendGreeting> {
    let name = user.name.as_deref().unwrap_or("there");
    Json(BackendGreeting {
        message: format!("Hello {}, your token checks out.", name),
        email: user.email,
        user_uid: user.uid,
    })
}
