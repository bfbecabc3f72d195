// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firebase Authentication identity provider.
//!
//! Handles:
//! - Email/password sign-in over the Identity Toolkit REST API
//! - ID token caching with refresh through the Secure Token API
//! - Publishing session expiry when the refresh token is rejected

use crate::config::{Config, ConfigError};
use crate::error::AuthError;
use crate::models::Identity;
use crate::services::identity::{IdentityChannel, IdentityProvider, TokenSource};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::{watch, RwLock};

const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com";
const SECURE_TOKEN_URL: &str = "https://securetoken.googleapis.com";

/// Margin before ID token expiration when we proactively refresh (5 minutes).
const TOKEN_REFRESH_MARGIN_SECS: i64 = 5 * 60;

/// Tokens of the current Firebase session.
#[derive(Clone)]
struct FirebaseSession {
    uid: String,
    id_token: String,
    refresh_token: String,
    expires_at: DateTime<Utc>,
}

type SharedSession = Arc<RwLock<Option<FirebaseSession>>>;

/// Identity provider backed by Firebase Authentication.
pub struct FirebaseAuth {
    http: reqwest::Client,
    api_key: String,
    identity_url: String,
    token_url: String,
    email: String,
    password: String,
    session: SharedSession,
    channel: Arc<IdentityChannel>,
}

impl FirebaseAuth {
    /// Create a provider that signs in with the given email and password.
    pub fn with_password(
        api_key: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            identity_url: IDENTITY_TOOLKIT_URL.to_string(),
            token_url: SECURE_TOKEN_URL.to_string(),
            email: email.into(),
            password: password.into(),
            session: Arc::new(RwLock::new(None)),
            channel: Arc::new(IdentityChannel::new()),
        }
    }

    /// Provider using `FIREBASE_API_KEY` from the configuration.
    pub fn from_config(
        config: &Config,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let api_key = config
            .firebase_api_key
            .as_deref()
            .ok_or(ConfigError::Missing("FIREBASE_API_KEY"))?;
        Ok(Self::with_password(api_key, email, password))
    }

    /// Point the provider at different Identity Toolkit / Secure Token hosts
    /// (the Firebase emulator or a test stub).
    pub fn with_endpoints(
        mut self,
        identity_url: impl Into<String>,
        token_url: impl Into<String>,
    ) -> Self {
        self.identity_url = identity_url.into().trim_end_matches('/').to_string();
        self.token_url = token_url.into().trim_end_matches('/').to_string();
        self
    }

    fn token_source(&self) -> FirebaseTokens {
        FirebaseTokens {
            http: self.http.clone(),
            api_key: self.api_key.clone(),
            token_url: self.token_url.clone(),
            session: self.session.clone(),
            channel: self.channel.clone(),
        }
    }
}

#[async_trait]
impl IdentityProvider for FirebaseAuth {
    async fn sign_in(&self) -> Result<Identity, AuthError> {
        let url = format!("{}/v1/accounts:signInWithPassword", self.identity_url);

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&serde_json::json!({
                "email": self.email,
                "password": self.password,
                "returnSecureToken": true,
            }))
            .send()
            .await
            .map_err(|e| AuthError::SignIn(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let reason = firebase_error_message(&body).unwrap_or_else(|| format!("HTTP {}", status));
            tracing::warn!(status = %status, reason = %reason, "Firebase sign-in rejected");
            return Err(AuthError::SignIn(reason));
        }

        let signed_in: SignInResponse = response
            .json()
            .await
            .map_err(|e| AuthError::SignIn(format!("Failed to parse sign-in response: {}", e)))?;

        let expires_at = Utc::now() + Duration::seconds(parse_expires_in(&signed_in.expires_in));

        *self.session.write().await = Some(FirebaseSession {
            uid: signed_in.local_id.clone(),
            id_token: signed_in.id_token,
            refresh_token: signed_in.refresh_token,
            expires_at,
        });

        let identity = Identity::new(
            signed_in.local_id,
            signed_in.display_name.filter(|n| !n.is_empty()),
            signed_in.email,
            signed_in.profile_picture,
            Arc::new(self.token_source()),
        );

        tracing::info!(uid = %identity.id, "Firebase sign-in succeeded");
        self.channel.publish(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        *self.session.write().await = None;
        self.channel.publish(None);
        tracing::info!("Firebase session cleared");
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.channel.subscribe()
    }
}

/// Token source handed out with each Firebase identity.
struct FirebaseTokens {
    http: reqwest::Client,
    api_key: String,
    token_url: String,
    session: SharedSession,
    channel: Arc<IdentityChannel>,
}

impl FirebaseTokens {
    fn usable(session: &FirebaseSession) -> bool {
        Utc::now() + Duration::seconds(TOKEN_REFRESH_MARGIN_SECS) < session.expires_at
    }

    async fn refresh(&self, refresh_token: &str) -> Result<RefreshResponse, RefreshFailure> {
        let url = format!("{}/v1/token", self.token_url);

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await
            .map_err(|e| RefreshFailure::Transient(e.to_string()))?;

        let status = response.status();
        if status.is_client_error() {
            let body = response.text().await.unwrap_or_default();
            let reason = firebase_error_message(&body).unwrap_or_else(|| format!("HTTP {}", status));
            return Err(RefreshFailure::Rejected(reason));
        }
        if !status.is_success() {
            return Err(RefreshFailure::Transient(format!("HTTP {}", status)));
        }

        response
            .json()
            .await
            .map_err(|e| RefreshFailure::Transient(format!("Failed to parse token response: {}", e)))
    }
}

enum RefreshFailure {
    /// Refresh token revoked or expired: the session is over.
    Rejected(String),
    Transient(String),
}

#[async_trait]
impl TokenSource for FirebaseTokens {
    async fn token(&self) -> Result<String, AuthError> {
        // Fast path: read lock, check cache.
        {
            let guard = self.session.read().await;
            match guard.as_ref() {
                None => return Err(AuthError::SignedOut),
                Some(session) if Self::usable(session) => return Ok(session.id_token.clone()),
                Some(_) => {}
            }
        }

        // Slow path: write lock, re-check, refresh.
        let mut guard = self.session.write().await;
        let current = match guard.as_ref() {
            None => return Err(AuthError::SignedOut),
            Some(session) if Self::usable(session) => return Ok(session.id_token.clone()),
            Some(session) => session.clone(),
        };

        tracing::debug!(uid = %current.uid, "Firebase ID token expiring, refreshing");

        match self.refresh(&current.refresh_token).await {
            Ok(fresh) => {
                let token = fresh.id_token.clone();
                *guard = Some(FirebaseSession {
                    uid: fresh.user_id.unwrap_or(current.uid),
                    id_token: fresh.id_token,
                    refresh_token: fresh.refresh_token,
                    expires_at: Utc::now() + Duration::seconds(parse_expires_in(&fresh.expires_in)),
                });
                Ok(token)
            }
            Err(RefreshFailure::Rejected(reason)) => {
                tracing::warn!(uid = %current.uid, reason = %reason, "Firebase session expired");
                *guard = None;
                drop(guard);
                self.channel.publish(None);
                Err(AuthError::Token(reason))
            }
            Err(RefreshFailure::Transient(reason)) => {
                tracing::warn!(uid = %current.uid, reason = %reason, "Firebase token refresh failed");
                Err(AuthError::Token(reason))
            }
        }
    }
}

/// Identity Toolkit `accounts:signInWithPassword` response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    email: Option<String>,
    display_name: Option<String>,
    #[serde(alias = "photoUrl")]
    profile_picture: Option<String>,
    id_token: String,
    refresh_token: String,
    expires_in: String,
}

/// Secure Token API refresh response.
#[derive(Debug, Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
    expires_in: String,
    user_id: Option<String>,
}

/// Firebase sends lifetimes as decimal strings of seconds.
fn parse_expires_in(raw: &str) -> i64 {
    raw.trim().parse().unwrap_or(3600)
}

/// Extract `error.message` from a Firebase REST error body.
fn firebase_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(str::to_string)
}
