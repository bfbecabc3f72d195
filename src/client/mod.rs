// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client state: session, suggestion feed, saved list, swipe handling and
//! the tab router, driven by [`ActivityMatch`].

pub mod app;
pub mod feed;
pub mod router;
pub mod saved;
pub mod session;
pub mod swipe;

#[cfg(test)]
pub(crate) mod testing;

pub use app::{ActivityMatch, ProfileSummary};
pub use feed::SuggestionFeed;
pub use router::{Screen, Tab, ViewRouter};
pub use saved::SavedActivitiesStore;
pub use session::{SessionStore, SessionTransition};
pub use swipe::{decide, feedback, DragGesture, SwipeDecision, SwipeFeedback};
