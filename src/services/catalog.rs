// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Suggestion catalog served by the reference API.

use crate::models::CandidateCard;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Catalog of activity suggestions.
#[derive(Debug, Clone)]
pub struct SuggestionCatalog {
    cards: Vec<CandidateCard>,
}

impl SuggestionCatalog {
    pub fn new(cards: Vec<CandidateCard>) -> Self {
        Self { cards }
    }

    /// Load the catalog from a JSON array of cards.
    pub fn load_from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let cards: Vec<CandidateCard> = serde_json::from_str(&content)?;
        if cards.is_empty() {
            anyhow::bail!("suggestion catalog {} is empty", path.as_ref().display());
        }
        Ok(Self { cards })
    }

    pub fn cards(&self) -> &[CandidateCard] {
        &self.cards
    }

    /// Cards in serving order.
    ///
    /// Without a user the catalog order is used. With one, the order is a
    /// stable per-user permutation.
    pub fn ranked_for(&self, user_uid: Option<&str>) -> Vec<CandidateCard> {
        let Some(uid) = user_uid.filter(|u| !u.is_empty()) else {
            return self.cards.clone();
        };

        let mut keyed: Vec<([u8; 32], &CandidateCard)> = self
            .cards
            .iter()
            .map(|card| {
                let mut hasher = Sha256::new();
                hasher.update(uid.as_bytes());
                hasher.update([0u8]);
                hasher.update(card.id.as_bytes());
                (hasher.finalize().into(), card)
            })
            .collect();
        keyed.sort_by(|a, b| a.0.cmp(&b.0));
        keyed.into_iter().map(|(_, card)| card.clone()).collect()
    }
}

impl Default for SuggestionCatalog {
    fn default() -> Self {
        let card = |id: &str, title: &str, description: &str, icon: &str, color: &str| {
            CandidateCard {
                id: id.to_string(),
                title: title.to_string(),
                description: description.to_string(),
                icon: Some(icon.to_string()),
                color_theme: Some(color.to_string()),
            }
        };

        Self::new(vec![
            card("1", "Sunrise Hike", "Catch the sunrise from the nearest ridge trail.", "🥾", "#F59E0B"),
            card("2", "Pottery Class", "Try the wheel at a beginner pottery studio.", "🏺", "#B45309"),
            card("3", "Board Game Night", "Invite friends over for a cooperative game.", "🎲", "#6366F1"),
            card("4", "Farmers Market", "Cook dinner from whatever looks best this week.", "🥕", "#16A34A"),
            card("5", "Kayak the Bay", "Rent a kayak for an hour on calm water.", "🛶", "#0EA5E9"),
            card("6", "Museum Afternoon", "Pick one gallery and actually read the placards.", "🖼️", "#DB2777"),
            card("7", "Bouldering", "Take an intro session at a climbing gym.", "🧗", "#EF4444"),
            card("8", "Stargazing", "Drive away from the city lights after dark.", "🔭", "#1E3A8A"),
        ])
    }
}
