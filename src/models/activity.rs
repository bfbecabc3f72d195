// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Saved activity model for the client store and the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use super::CandidateCard;

/// Remote synchronization state of a saved activity.
///
/// Local state is never rolled back; this only records what the last
/// remote write for the entry did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncStatus {
    /// A remote write has been issued and has not completed yet.
    Pending,
    /// The server acknowledged the last write, or the entry came from a full load.
    #[default]
    Confirmed,
    /// The last remote write failed; local state diverges until the next load.
    Failed,
}

/// Activity the user has committed to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SavedActivity {
    #[serde(deserialize_with = "super::string_or_number")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub is_completed: bool,
    /// Client-side only
    #[serde(skip)]
    #[cfg_attr(feature = "binding-generation", ts(skip))]
    pub sync: SyncStatus,
}

impl SavedActivity {
    /// Build the optimistic local entry for an accepted card.
    pub fn from_card(local_id: String, card: &CandidateCard) -> Self {
        Self {
            id: local_id,
            title: card.title.clone(),
            description: card.description.clone(),
            image_url: card.icon.clone(),
            created_at: Utc::now(),
            is_completed: false,
            sync: SyncStatus::Pending,
        }
    }
}

/// Body of `POST /api/activities`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct NewActivity {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub image_url: Option<String>,
}

impl From<&CandidateCard> for NewActivity {
    fn from(card: &CandidateCard) -> Self {
        // Cards may carry an emoji instead of an image; only URLs go over the wire.
        let image_url = card
            .icon
            .as_ref()
            .filter(|icon| icon.starts_with("http://") || icon.starts_with("https://"))
            .cloned();

        Self {
            title: card.title.clone(),
            description: card.description.clone(),
            image_url,
        }
    }
}

/// Body of `PUT /api/activities/{id}`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CompletionUpdate {
    pub is_completed: bool,
}
