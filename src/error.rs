// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Error types for the client side (API transport, identity provider) and
//! the reference API server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

// ─── Client errors ──────────────────────────────────────────────────────────

/// Failure talking to the remote Activity API.
///
/// Error bodies are never parsed; a non-2xx response is only its status.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP {0}")]
    Status(u16),

    #[error("network: {0}")]
    Network(#[from] reqwest::Error),

    #[error("auth: {0}")]
    Auth(#[from] AuthError),

    #[error("decode: {0}")]
    Decode(String),
}

impl ApiError {
    /// Whether the server rejected the caller's credentials.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Status(401) | ApiError::Status(403))
            || matches!(self, ApiError::Auth(_))
    }
}

/// Failure reported by the identity provider.
///
/// The `Display` text is what the sign-in screen shows.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthError {
    #[error("Sign-in failed: {0}")]
    SignIn(String),

    #[error("Not signed in")]
    SignedOut,

    #[error("Could not refresh credentials: {0}")]
    Token(String),
}

// ─── Server errors ──────────────────────────────────────────────────────────

/// Reference API error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::BadRequest(errors.to_string())
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
