// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Suggestion feed: the ordered cards still awaiting a decision.

use crate::error::ApiError;
use crate::models::{CandidateCard, Identity};
use crate::services::ActivityApi;
use std::collections::HashSet;

/// Number of front cards mounted at any time.
pub const VISIBLE_CARDS: usize = 2;

/// In-memory sequence of undecided cards, in server order.
#[derive(Debug, Default)]
pub struct SuggestionFeed {
    cards: Vec<CandidateCard>,
    /// Ids decided this session; they never come back.
    decided: HashSet<String>,
    /// Successful fetches since construction.
    fetches: u64,
}

impl SuggestionFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch a new batch and replace the whole sequence with it.
    ///
    /// On failure the previous sequence is kept and the error is logged and
    /// returned. Nothing is retried.
    pub async fn refresh(
        &mut self,
        api: &dyn ActivityApi,
        identity: Option<&Identity>,
    ) -> Result<usize, ApiError> {
        let user_uid = identity.map(|i| i.id.as_str());
        match api.suggestions(user_uid).await {
            Ok(cards) => Ok(self.replace(cards)),
            Err(e) => {
                tracing::warn!(error = %e, kept = self.cards.len(), "Failed to fetch suggestions");
                Err(e)
            }
        }
    }

    /// Replace the sequence with a fetched batch, minus cards already
    /// decided this session. Server order is kept. Returns the new length.
    pub fn replace(&mut self, cards: Vec<CandidateCard>) -> usize {
        let fetched = cards.len();
        self.cards = cards
            .into_iter()
            .filter(|c| !self.decided.contains(&c.id))
            .collect();
        self.fetches += 1;
        tracing::info!(
            count = self.cards.len(),
            skipped = fetched - self.cards.len(),
            "Suggestion feed replaced"
        );
        self.cards.len()
    }

    /// Remove the card with `id` from the visible front of the feed.
    ///
    /// Deeper cards cannot be decided until promoted, so they are left alone.
    pub fn consume(&mut self, id: &str) -> Option<CandidateCard> {
        let position = self.visible().iter().position(|c| c.id == id)?;
        Some(self.decide_at(position))
    }

    /// Remove the front card.
    pub fn consume_top(&mut self) -> Option<CandidateCard> {
        if self.cards.is_empty() {
            return None;
        }
        Some(self.decide_at(0))
    }

    fn decide_at(&mut self, position: usize) -> CandidateCard {
        let card = self.cards.remove(position);
        self.decided.insert(card.id.clone());
        card
    }

    pub fn is_decided(&self, id: &str) -> bool {
        self.decided.contains(id)
    }

    pub fn top(&self) -> Option<&CandidateCard> {
        self.cards.first()
    }

    /// Cards currently rendered (at most [`VISIBLE_CARDS`]).
    pub fn visible(&self) -> &[CandidateCard] {
        &self.cards[..self.cards.len().min(VISIBLE_CARDS)]
    }

    pub fn cards(&self) -> &[CandidateCard] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Whether the "fetch more" action should be shown. The feed never
    /// refills on its own.
    pub fn needs_refill(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn fetch_count(&self) -> u64 {
        self.fetches
    }

    /// End of session: drop the cards and forget past decisions.
    pub fn clear(&mut self) {
        self.cards.clear();
        self.decided.clear();
    }
}
