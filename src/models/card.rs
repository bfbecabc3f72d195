// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Candidate card model (an unreviewed activity suggestion).

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Suggested activity awaiting a swipe decision.
///
/// Cards are immutable once received from the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CandidateCard {
    #[serde(deserialize_with = "super::string_or_number")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Emoji icon or image URL
    #[serde(default, alias = "image_url")]
    pub icon: Option<String>,
    /// Background colour theme (CSS colour or theme name)
    #[serde(default, alias = "color")]
    pub color_theme: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_numeric_id_and_aliases() {
        let json = r##"{"id": 7, "title": "Sunrise hike", "image_url": "https://x/h.png", "color": "#ffaa00"}"##;
        let card: CandidateCard = serde_json::from_str(json).unwrap();
        assert_eq!(card.id, "7");
        assert_eq!(card.description, "");
        assert_eq!(card.icon.as_deref(), Some("https://x/h.png"));
        assert_eq!(card.color_theme.as_deref(), Some("#ffaa00"));
    }

    #[test]
    fn test_deserialize_string_id() {
        let json = r#"{"id": "abc", "title": "Pottery", "description": "Wheel class", "icon": "🏺"}"#;
        let card: CandidateCard = serde_json::from_str(json).unwrap();
        assert_eq!(card.id, "abc");
        assert_eq!(card.icon.as_deref(), Some("🏺"));
        assert!(card.color_theme.is_none());
    }
}
