// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client controller wiring the session, feed, saved list and swipe handler.
//!
//! All methods run on the caller's task, one event at a time. Remote writes
//! are spawned and their completions applied by `poll_sync` / `settle`.

use crate::config::{Config, FeedAccess};
use crate::error::{ApiError, AuthError};
use crate::models::{BackendGreeting, CandidateCard, Identity, SavedActivity};
use crate::services::{ActivityApi, HttpActivityApi, IdentityProvider};
use std::sync::Arc;

use super::feed::SuggestionFeed;
use super::router::{Screen, Tab, ViewRouter};
use super::saved::SavedActivitiesStore;
use super::session::{SessionStore, SessionTransition};
use super::swipe::{decide, DragGesture, SwipeDecision, SwipeFeedback};

/// Profile panel contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSummary {
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub photo_url: Option<String>,
    pub saved_count: usize,
    pub completed_count: usize,
}

/// The Activity Match client.
pub struct ActivityMatch {
    provider: Arc<dyn IdentityProvider>,
    api: Arc<dyn ActivityApi>,
    access: FeedAccess,
    session: SessionStore,
    feed: SuggestionFeed,
    saved: SavedActivitiesStore,
    router: ViewRouter,
    drag: DragGesture,
    greeting: Option<BackendGreeting>,
    /// Transient message for the active panel.
    notice: Option<String>,
}

impl ActivityMatch {
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        api: Arc<dyn ActivityApi>,
        access: FeedAccess,
    ) -> Self {
        Self {
            saved: SavedActivitiesStore::new(api.clone()),
            provider,
            api,
            access,
            session: SessionStore::new(),
            feed: SuggestionFeed::new(),
            router: ViewRouter::default(),
            drag: DragGesture::default(),
            greeting: None,
            notice: None,
        }
    }

    /// Client talking HTTP to `config.api_base_url` with the configured feed policy.
    pub fn from_config(
        config: &Config,
        provider: Arc<dyn IdentityProvider>,
    ) -> Result<Self, ApiError> {
        let api = HttpActivityApi::new(config.api_base_url.clone())?;
        Ok(Self::new(provider, Arc::new(api), config.feed_access))
    }

    // ─── Lifecycle ───────────────────────────────────────────────────────────

    /// Subscribe to the identity provider and load whatever the current
    /// session allows.
    pub async fn start(&mut self) -> SessionTransition {
        let transition = self.session.init(self.provider.as_ref());
        self.on_transition(&transition).await;

        if !self.session.is_signed_in() && self.access == FeedAccess::Public {
            let _ = self.feed.refresh(self.api.as_ref(), None).await;
        }
        transition
    }

    /// Unsubscribe from the identity provider.
    pub fn shutdown(&mut self) {
        self.session.teardown();
        tracing::info!("Client shut down");
    }

    /// Apply the provider's latest identity, if it changed.
    pub async fn sync_session(&mut self) -> SessionTransition {
        match self.session.poll_change() {
            Some(next) => self.apply_identity(next).await,
            None => SessionTransition::Unchanged,
        }
    }

    /// Wait for the next provider notification and apply it. Returns `None`
    /// once unsubscribed.
    pub async fn next_session_change(&mut self) -> Option<SessionTransition> {
        let next = self.session.next_change().await?;
        Some(self.apply_identity(next).await)
    }

    /// Interactive sign-in. Failures are kept as the displayed error.
    pub async fn sign_in(&mut self) -> Result<SessionTransition, AuthError> {
        match self.provider.sign_in().await {
            Ok(identity) => {
                // The provider also notified subscribers; this identity supersedes it.
                let _ = self.session.poll_change();
                Ok(self.apply_identity(Some(identity)).await)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Sign-in failed");
                self.session.set_error(e.to_string());
                Err(e)
            }
        }
    }

    /// Sign out and drop the identity, feed and saved list together.
    pub async fn sign_out(&mut self) {
        if let Err(e) = self.provider.sign_out().await {
            tracing::warn!(error = %e, "Identity provider sign-out failed; clearing local session anyway");
        }
        let _ = self.session.poll_change();
        self.apply_identity(None).await;
    }

    async fn apply_identity(&mut self, next: Option<Identity>) -> SessionTransition {
        let transition = self.session.apply(next);
        self.on_transition(&transition).await;
        transition
    }

    async fn on_transition(&mut self, transition: &SessionTransition) {
        match transition {
            SessionTransition::SignedIn => {
                self.notice = None;
                self.reload().await;
            }
            SessionTransition::Switched => {
                self.clear_user_state();
                self.reload().await;
            }
            SessionTransition::SignedOut => {
                self.clear_user_state();
                self.router.reset();
            }
            SessionTransition::Refreshed | SessionTransition::Unchanged => {}
        }
    }

    /// Fetch the feed and the saved list for the current identity.
    async fn reload(&mut self) {
        let Some(identity) = self.session.identity().cloned() else {
            return;
        };

        let (feed, saved) = futures_util::future::join(
            self.feed.refresh(self.api.as_ref(), Some(&identity)),
            self.saved.load(&identity),
        )
        .await;

        tracing::info!(
            uid = %identity.id,
            cards = ?feed.as_ref().ok(),
            saved = ?saved.as_ref().ok(),
            "Session data loaded"
        );
    }

    /// Drop everything tied to the previous user, including which cards
    /// they already decided on.
    fn clear_user_state(&mut self) {
        self.feed.clear();
        self.saved.clear();
        self.drag.cancel();
        self.greeting = None;
        self.notice = None;
    }

    // ─── Feed ────────────────────────────────────────────────────────────────

    /// The "fetch more" action. Previous cards stay on failure.
    pub async fn refresh_feed(&mut self) -> Result<usize, ApiError> {
        let identity = self.session.identity().cloned();
        self.feed.refresh(self.api.as_ref(), identity.as_ref()).await
    }

    pub fn needs_refill(&self) -> bool {
        self.feed_available() && self.feed.needs_refill()
    }

    fn feed_available(&self) -> bool {
        self.session.is_signed_in() || self.access == FeedAccess::Public
    }

    // ─── Swipe ───────────────────────────────────────────────────────────────

    pub fn begin_drag(&mut self) {
        if self.feed.top().is_some() {
            self.drag.begin();
        }
    }

    pub fn drag_to(&mut self, displacement: f64) -> SwipeFeedback {
        self.drag.update(displacement);
        self.drag.feedback()
    }

    /// Release the drag on the top card and apply the decision, if any.
    pub fn release_drag(&mut self) -> Option<SwipeDecision> {
        let decision = self.drag.release()?;
        self.apply_decision(decision).map(|_| decision)
    }

    /// A full drag of the top card released at `displacement`.
    pub fn swipe(&mut self, displacement: f64) -> Option<SwipeDecision> {
        self.begin_drag();
        self.drag.update(displacement);
        self.release_drag()
    }

    /// Apply a decision to the top card (also used by the like/nope buttons).
    pub fn apply_decision(&mut self, decision: SwipeDecision) -> Option<CandidateCard> {
        let top_id = self.feed.top()?.id.clone();

        match decision {
            SwipeDecision::Accept => {
                let Some(identity) = self.session.identity().cloned() else {
                    tracing::info!(card_id = %top_id, "Accept ignored while signed out");
                    self.notice = Some("Sign in to save activities".to_string());
                    return None;
                };
                let card = self.feed.consume(&top_id)?;
                self.saved.add(&identity, &card);
                tracing::info!(card_id = %card.id, "Card accepted");
                Some(card)
            }
            SwipeDecision::Reject => {
                let card = self.feed.consume(&top_id)?;
                tracing::debug!(card_id = %card.id, "Card rejected");
                Some(card)
            }
        }
    }

    /// Decision a release at `displacement` would make, without applying it.
    pub fn preview(&self, displacement: f64) -> Option<SwipeDecision> {
        decide(displacement)
    }

    // ─── Saved list ──────────────────────────────────────────────────────────

    pub fn toggle_completion(&mut self, id: &str) -> Option<bool> {
        let identity = self.session.identity()?.clone();
        self.saved.toggle_completion(&identity, id)
    }

    pub fn delete_activity(&mut self, id: &str) -> Option<SavedActivity> {
        let identity = self.session.identity()?.clone();
        self.saved.remove(&identity, id)
    }

    /// Apply completed remote writes without waiting.
    pub fn poll_sync(&mut self) -> usize {
        self.saved.poll_sync()
    }

    /// Wait for all in-flight remote writes and apply them.
    pub async fn settle(&mut self) -> usize {
        self.saved.settle().await
    }

    // ─── Profile ─────────────────────────────────────────────────────────────

    pub fn profile(&self) -> Option<ProfileSummary> {
        let identity = self.session.identity()?;
        Some(ProfileSummary {
            display_name: identity.display_name.clone(),
            email: identity.email.clone(),
            photo_url: identity.photo_url.clone(),
            saved_count: self.saved.len(),
            completed_count: self.saved.completed_count(),
        })
    }

    /// Ask the backend who it thinks we are.
    pub async fn load_greeting(&mut self) -> Result<&BackendGreeting, ApiError> {
        let identity = self
            .session
            .identity()
            .cloned()
            .ok_or(ApiError::Auth(AuthError::SignedOut))?;

        match self.api.greeting(&identity).await {
            Ok(greeting) => Ok(self.greeting.insert(greeting)),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to call backend");
                Err(e)
            }
        }
    }

    pub fn greeting(&self) -> Option<&BackendGreeting> {
        self.greeting.as_ref()
    }

    /// Message to show over the current panel, if any.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    // ─── View ────────────────────────────────────────────────────────────────

    pub fn select_tab(&mut self, tab: Tab) {
        self.router.select(tab);
    }

    pub fn screen(&self) -> Screen {
        if !self.session.is_signed_in() && self.access == FeedAccess::SignedInOnly {
            return Screen::SignIn {
                error: self.session.error().map(str::to_string),
            };
        }
        Screen::Panel(self.router.active())
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn feed(&self) -> &SuggestionFeed {
        &self.feed
    }

    pub fn saved(&self) -> &SavedActivitiesStore {
        &self.saved
    }

    pub fn drag(&self) -> &DragGesture {
        &self.drag
    }
}
