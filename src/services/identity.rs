// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity provider boundary.
//!
//! The session store only sees the [`IdentityProvider`] trait, so tests and
//! local development can swap in a provider that never leaves the process.

use crate::error::AuthError;
use crate::middleware::auth::create_jwt;
use crate::models::Identity;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// Lifetime of tokens minted by [`DevIdentityProvider`] (1 hour).
const DEV_TOKEN_TTL_SECS: u64 = 60 * 60;

/// Source of short-lived bearer credentials. Called before every API request.
#[async_trait]
pub trait TokenSource: Send + Sync + 'static {
    async fn token(&self) -> Result<String, AuthError>;
}

/// External identity provider.
///
/// Implementations publish every identity change (sign-in, sign-out,
/// session expiry) to their subscribers.
#[async_trait]
pub trait IdentityProvider: Send + Sync + 'static {
    /// Interactive sign-in.
    async fn sign_in(&self) -> Result<Identity, AuthError>;

    /// End the provider session.
    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Subscribe to identity changes. Dropping the receiver unsubscribes.
    fn subscribe(&self) -> watch::Receiver<Option<Identity>>;
}

/// Change-notification channel shared by provider implementations.
pub struct IdentityChannel {
    tx: watch::Sender<Option<Identity>>,
}

impl IdentityChannel {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// Replace the current identity and notify subscribers.
    pub fn publish(&self, identity: Option<Identity>) {
        self.tx.send_replace(identity);
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.tx.subscribe()
    }
}

impl Default for IdentityChannel {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Development provider
// ─────────────────────────────────────────────────────────────────────────────

/// Profile the development provider signs in as.
#[derive(Debug, Clone)]
pub struct DevProfile {
    pub uid: String,
    pub display_name: String,
    pub email: String,
    pub photo_url: Option<String>,
}

impl Default for DevProfile {
    fn default() -> Self {
        Self {
            uid: "dev-user".to_string(),
            display_name: "Dev User".to_string(),
            email: "dev@localhost".to_string(),
            photo_url: None,
        }
    }
}

/// Identity provider for local development against the reference server.
///
/// Signs in without user interaction and mints an HS256 JWT on every token
/// request, signed with the same key the server verifies.
pub struct DevIdentityProvider {
    profile: DevProfile,
    signing_key: Arc<[u8]>,
    channel: IdentityChannel,
    /// Revocation flag of the tokens handed out by the current session.
    active: std::sync::Mutex<Option<Arc<AtomicBool>>>,
}

impl DevIdentityProvider {
    pub fn new(profile: DevProfile, signing_key: &[u8]) -> Self {
        Self {
            profile,
            signing_key: Arc::from(signing_key),
            channel: IdentityChannel::new(),
            active: std::sync::Mutex::new(None),
        }
    }

    fn revoke_current(&self) {
        let previous = match self.active.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(flag) = previous {
            flag.store(false, Ordering::SeqCst);
        }
    }
}

#[async_trait]
impl IdentityProvider for DevIdentityProvider {
    async fn sign_in(&self) -> Result<Identity, AuthError> {
        self.revoke_current();

        let flag = Arc::new(AtomicBool::new(true));
        let tokens = DevTokens {
            uid: self.profile.uid.clone(),
            email: self.profile.email.clone(),
            name: self.profile.display_name.clone(),
            signing_key: self.signing_key.clone(),
            active: flag.clone(),
        };

        match self.active.lock() {
            Ok(mut guard) => *guard = Some(flag),
            Err(poisoned) => *poisoned.into_inner() = Some(flag),
        }

        let identity = Identity::new(
            self.profile.uid.clone(),
            Some(self.profile.display_name.clone()),
            Some(self.profile.email.clone()),
            self.profile.photo_url.clone(),
            Arc::new(tokens),
        );

        tracing::info!(uid = %identity.id, "Dev identity signed in");
        self.channel.publish(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.revoke_current();
        self.channel.publish(None);
        tracing::info!("Dev identity signed out");
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.channel.subscribe()
    }
}

/// Token source minting a fresh JWT per call until the session ends.
struct DevTokens {
    uid: String,
    email: String,
    name: String,
    signing_key: Arc<[u8]>,
    active: Arc<AtomicBool>,
}

#[async_trait]
impl TokenSource for DevTokens {
    async fn token(&self) -> Result<String, AuthError> {
        if !self.active.load(Ordering::SeqCst) {
            return Err(AuthError::SignedOut);
        }

        create_jwt(
            &self.uid,
            Some(&self.email),
            Some(&self.name),
            &self.signing_key,
            DEV_TOKEN_TTL_SECS,
        )
        .map_err(|e| AuthError::Token(e.to_string()))
    }
}

/// Static bearer token obtained out of band.
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl TokenSource for StaticToken {
    async fn token(&self) -> Result<String, AuthError> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::auth::verify_jwt;

    const KEY: &[u8] = b"test_jwt_key_32_bytes_minimum!!";

    #[tokio::test]
    async fn test_dev_sign_in_publishes_identity() {
        let provider = DevIdentityProvider::new(DevProfile::default(), KEY);
        let mut rx = provider.subscribe();
        assert!(rx.borrow_and_update().is_none());

        let identity = provider.sign_in().await.unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(
            rx.borrow_and_update().as_ref().map(|i| i.id.clone()),
            Some(identity.id.clone())
        );

        let token = identity.token().await.unwrap();
        let claims = verify_jwt(&token, KEY).unwrap();
        assert_eq!(claims.sub, "dev-user");
        assert_eq!(claims.email.as_deref(), Some("dev@localhost"));
    }

    #[tokio::test]
    async fn test_tokens_stop_after_sign_out() {
        let provider = DevIdentityProvider::new(DevProfile::default(), KEY);
        let identity = provider.sign_in().await.unwrap();
        provider.sign_out().await.unwrap();

        assert!(matches!(identity.token().await, Err(AuthError::SignedOut)));
        assert!(provider.subscribe().borrow().is_none());
    }

    #[tokio::test]
    async fn test_static_token() {
        let ts = StaticToken::new("my-jwt-token");
        assert_eq!(ts.token().await.unwrap(), "my-jwt-token");
    }
}
