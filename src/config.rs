// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Shared by the client (API base URL, identity provider settings, feed
//! policy) and the reference API server (port, signing key, catalog).

use std::env;
use std::str::FromStr;

/// Whether the suggestion feed is usable before sign-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedAccess {
    /// Feed loads without an identity; the saved list still needs one.
    Public,
    /// Nothing is shown until the user signs in.
    #[default]
    SignedInOnly,
}

impl FromStr for FeedAccess {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "public" => Ok(FeedAccess::Public),
            "signed_in_only" | "signed-in-only" => Ok(FeedAccess::SignedInOnly),
            _ => Err(ConfigError::Invalid("FEED_ACCESS")),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the Activity API the client talks to
    pub api_base_url: String,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Reference server port
    pub port: u16,
    /// JWT signing key shared by the dev identity provider and the reference server
    pub jwt_signing_key: Vec<u8>,
    /// Optional JSON file with the suggestion catalog
    pub suggestions_path: Option<String>,
    /// Firebase Web API key, when signing in through Firebase
    pub firebase_api_key: Option<String>,
    /// Feed visibility before sign-in
    pub feed_access: FeedAccess,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let feed_access = match env::var("FEED_ACCESS") {
            Ok(v) => v.parse()?,
            Err(_) => FeedAccess::default(),
        };

        Ok(Self {
            api_base_url: env::var("API_BASE_URL")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
            suggestions_path: env::var("SUGGESTIONS_PATH").ok().filter(|v| !v.is_empty()),
            firebase_api_key: env::var("FIREBASE_API_KEY")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            feed_access,
        })
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            api_base_url: "http://localhost:8080".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            suggestions_path: None,
            firebase_api_key: None,
            feed_access: FeedAccess::SignedInOnly,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
