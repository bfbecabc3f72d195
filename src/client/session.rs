// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session store: mirrors the identity provider's live session.

use crate::models::Identity;
use crate::services::IdentityProvider;
use tokio::sync::watch;

/// What an identity change means for the rest of the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionTransition {
    /// No identity before, one now: reload everything.
    SignedIn,
    /// A different user replaced the previous one.
    Switched,
    /// Same user, refreshed identity (e.g. new profile fields).
    Refreshed,
    SignedOut,
    Unchanged,
}

/// Current identity plus the last sign-in error.
#[derive(Debug, Default)]
pub struct SessionStore {
    identity: Option<Identity>,
    error: Option<String>,
    changes: Option<watch::Receiver<Option<Identity>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to the provider. Returns the transition for the identity
    /// the provider already holds (a restored session).
    pub fn init(&mut self, provider: &dyn IdentityProvider) -> SessionTransition {
        let mut changes = provider.subscribe();
        let current = changes.borrow_and_update().clone();
        self.changes = Some(changes);
        self.apply(current)
    }

    /// Unsubscribe from the provider.
    pub fn teardown(&mut self) {
        self.changes = None;
    }

    pub fn is_subscribed(&self) -> bool {
        self.changes.is_some()
    }

    /// Take the provider's latest identity if it changed since last seen.
    pub fn poll_change(&mut self) -> Option<Option<Identity>> {
        let changes = self.changes.as_mut()?;
        match changes.has_changed() {
            Ok(true) => Some(changes.borrow_and_update().clone()),
            Ok(false) => None,
            Err(_) => {
                tracing::warn!("Identity provider closed its change channel");
                self.changes = None;
                None
            }
        }
    }

    /// Wait for the next provider notification.
    pub async fn next_change(&mut self) -> Option<Option<Identity>> {
        let changes = self.changes.as_mut()?;
        match changes.changed().await {
            Ok(()) => Some(changes.borrow_and_update().clone()),
            Err(_) => {
                self.changes = None;
                None
            }
        }
    }

    /// Replace the current identity (or clear it).
    pub fn apply(&mut self, next: Option<Identity>) -> SessionTransition {
        let transition = match (&self.identity, &next) {
            (None, None) => SessionTransition::Unchanged,
            (None, Some(_)) => SessionTransition::SignedIn,
            (Some(_), None) => SessionTransition::SignedOut,
            (Some(prev), Some(new)) if prev.id == new.id => SessionTransition::Refreshed,
            (Some(_), Some(_)) => SessionTransition::Switched,
        };

        if next.is_some() {
            self.error = None;
        }
        match (&transition, &next) {
            (SessionTransition::SignedIn, Some(identity))
            | (SessionTransition::Switched, Some(identity)) => {
                tracing::info!(uid = %identity.id, "Session started")
            }
            (SessionTransition::SignedOut, _) => tracing::info!("Session ended"),
            _ => {}
        }

        self.identity = next;
        transition
    }

    /// Record a sign-in failure for display.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.identity.is_some()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::{identity, FakeProvider};

    #[test]
    fn test_transitions() {
        let mut session = SessionStore::new();
        assert_eq!(session.apply(None), SessionTransition::Unchanged);
        assert_eq!(session.apply(Some(identity("a"))), SessionTransition::SignedIn);
        assert_eq!(session.apply(Some(identity("a"))), SessionTransition::Refreshed);
        assert_eq!(session.apply(Some(identity("b"))), SessionTransition::Switched);
        assert_eq!(session.apply(None), SessionTransition::SignedOut);
        assert!(!session.is_signed_in());
    }

    #[test]
    fn test_successful_identity_clears_error() {
        let mut session = SessionStore::new();
        session.set_error("Sign-in failed: cancelled");
        assert_eq!(session.error(), Some("Sign-in failed: cancelled"));
        session.apply(Some(identity("a")));
        assert!(session.error().is_none());
    }

    #[tokio::test]
    async fn test_init_and_poll_provider_changes() {
        let provider = FakeProvider::new("a");
        provider.publish(Some(identity("a")));

        let mut session = SessionStore::new();
        assert_eq!(session.init(&provider), SessionTransition::SignedIn);
        assert!(session.poll_change().is_none());

        provider.publish(None);
        let change = session.poll_change().expect("change pending");
        assert!(change.is_none());
        assert_eq!(session.apply(change), SessionTransition::SignedOut);

        session.teardown();
        provider.publish(Some(identity("a")));
        assert!(session.poll_change().is_none());
        assert!(!session.is_subscribed());
    }
}
