// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory activity storage keyed by user id.

use crate::models::{NewActivity, SavedActivity, SyncStatus};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Per-user saved activity lists, newest first.
#[derive(Clone, Default)]
pub struct MemoryDb {
    activities: Arc<DashMap<String, Vec<SavedActivity>>>,
    next_id: Arc<AtomicU64>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// All activities for a user, newest first.
    pub fn list_activities(&self, uid: &str) -> Vec<SavedActivity> {
        self.activities
            .get(uid)
            .map(|list| list.clone())
            .unwrap_or_default()
    }

    /// Store a new activity and return it with its assigned id.
    pub fn create_activity(&self, uid: &str, new: NewActivity) -> SavedActivity {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let activity = SavedActivity {
            id: id.to_string(),
            title: new.title,
            description: new.description,
            image_url: new.image_url,
            created_at: chrono::Utc::now(),
            is_completed: false,
            sync: SyncStatus::Confirmed,
        };

        self.activities
            .entry(uid.to_string())
            .or_default()
            .insert(0, activity.clone());

        tracing::debug!(uid, activity_id = %activity.id, "Activity stored");
        activity
    }

    /// Set the completion flag. Returns the updated activity, or `None` if
    /// the user has no activity with that id.
    pub fn set_completed(&self, uid: &str, id: &str, is_completed: bool) -> Option<SavedActivity> {
        let mut list = self.activities.get_mut(uid)?;
        let activity = list.iter_mut().find(|a| a.id == id)?;
        activity.is_completed = is_completed;
        Some(activity.clone())
    }

    /// Delete an activity. Returns whether it existed.
    pub fn delete_activity(&self, uid: &str, id: &str) -> bool {
        let Some(mut list) = self.activities.get_mut(uid) else {
            return false;
        };
        let before = list.len();
        list.retain(|a| a.id != id);
        list.len() != before
    }

    /// Number of users with a list, and activities across all of them.
    pub fn totals(&self) -> (usize, usize) {
        self.activities
            .iter()
            .fold((0, 0), |(users, items), entry| (users + 1, items + entry.len()))
    }
}
