// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models shared by the client stores and the reference API.

pub mod activity;
pub mod card;
pub mod identity;

pub use activity::{CompletionUpdate, NewActivity, SavedActivity, SyncStatus};
pub use card::CandidateCard;
pub use identity::{BackendGreeting, Identity};

use serde::{Deserialize, Deserializer};

/// Accept an id sent either as a JSON string or as a JSON number.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Int(n) => n.to_string(),
        RawId::Float(n) => n.to_string(),
    })
}
