// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Saved activities store with optimistic remote synchronization.
//!
//! Every mutation is applied locally first and never rolled back. The
//! matching remote write runs as a spawned task; its completion is applied
//! later as a discrete event (`poll_sync` / `settle`). It updates the
//! entry's [`SyncStatus`] and may issue one follow-up write. The local list
//! converges with the server on the next full `load`.

use crate::error::ApiError;
use crate::models::{CandidateCard, Identity, NewActivity, SavedActivity, SyncStatus};
use crate::services::ActivityApi;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::task::{JoinError, JoinSet};

const LOCAL_ID_PREFIX: &str = "local-";

/// Completion of one remote write.
#[derive(Debug)]
enum SyncOutcome {
    Created {
        local_id: String,
        identity: Identity,
        result: Result<Option<SavedActivity>, ApiError>,
    },
    Updated {
        id: String,
        identity: Identity,
        /// Matches `updates` while this is the current request for `id`.
        seq: u64,
        sent: bool,
        result: Result<(), ApiError>,
    },
    Deleted {
        id: String,
        result: Result<(), ApiError>,
    },
}

/// Activities the user has committed to, newest first.
pub struct SavedActivitiesStore {
    api: Arc<dyn ActivityApi>,
    items: Vec<SavedActivity>,
    in_flight: JoinSet<SyncOutcome>,
    /// Local ids whose create request has not completed.
    awaiting_create: HashSet<String>,
    /// Local ids removed before their create completed.
    orphaned: HashSet<String>,
    /// Sequence number of the one update request in flight per activity id.
    updates: HashMap<String, u64>,
    next_update: u64,
    next_local: u64,
    loads: u64,
}

impl SavedActivitiesStore {
    pub fn new(api: Arc<dyn ActivityApi>) -> Self {
        Self {
            api,
            items: Vec::new(),
            in_flight: JoinSet::new(),
            awaiting_create: HashSet::new(),
            orphaned: HashSet::new(),
            updates: HashMap::new(),
            next_update: 0,
            next_local: 0,
            loads: 0,
        }
    }

    // ─── Reads ───────────────────────────────────────────────────────────────

    /// Replace the local collection with the server's full listing.
    ///
    /// On failure the current collection is kept.
    pub async fn load(&mut self, identity: &Identity) -> Result<usize, ApiError> {
        match self.api.list_activities(identity).await {
            Ok(items) => Ok(self.replace(items)),
            Err(e) => {
                tracing::warn!(
                    uid = %identity.id,
                    error = %e,
                    kept = self.items.len(),
                    "Failed to load saved activities"
                );
                Err(e)
            }
        }
    }

    /// Install a full listing, in the order returned.
    pub fn replace(&mut self, items: Vec<SavedActivity>) -> usize {
        self.items = items
            .into_iter()
            .map(|mut item| {
                item.sync = SyncStatus::Confirmed;
                item
            })
            .collect();
        self.awaiting_create.clear();
        self.orphaned.clear();
        self.updates.clear();
        self.loads += 1;
        tracing::info!(count = self.items.len(), "Saved activities replaced");
        self.items.len()
    }

    pub fn items(&self) -> &[SavedActivity] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&SavedActivity> {
        self.items.iter().find(|a| a.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn completed_count(&self) -> usize {
        self.items.iter().filter(|a| a.is_completed).count()
    }

    /// Entries whose last remote write failed.
    pub fn failed(&self) -> Vec<&SavedActivity> {
        self.items
            .iter()
            .filter(|a| a.sync == SyncStatus::Failed)
            .collect()
    }

    /// Remote writes issued and not yet applied.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn load_count(&self) -> u64 {
        self.loads
    }

    // ─── Optimistic mutations ────────────────────────────────────────────────

    /// Save an accepted card: insert at the head immediately, then create
    /// it remotely in the background.
    pub fn add(&mut self, identity: &Identity, card: &CandidateCard) -> &SavedActivity {
        self.next_local += 1;
        let local_id = format!("{}{}", LOCAL_ID_PREFIX, self.next_local);

        self.items
            .insert(0, SavedActivity::from_card(local_id.clone(), card));
        self.awaiting_create.insert(local_id.clone());

        let api = self.api.clone();
        let identity = identity.clone();
        let body = NewActivity::from(card);
        self.in_flight.spawn(async move {
            let result = api.create_activity(&identity, &body).await;
            SyncOutcome::Created {
                local_id,
                identity,
                result,
            }
        });

        &self.items[0]
    }

    /// Delete locally, then remotely in the background.
    pub fn remove(&mut self, identity: &Identity, id: &str) -> Option<SavedActivity> {
        let position = self.items.iter().position(|a| a.id == id)?;
        let removed = self.items.remove(position);
        self.updates.remove(id);

        if self.awaiting_create.contains(id) {
            // The server has no id for it yet; delete once the create lands.
            self.orphaned.insert(id.to_string());
        } else {
            self.spawn_delete(identity, id.to_string());
        }

        Some(removed)
    }

    /// Flip the completion flag locally, then update it remotely in the
    /// background. Returns the new value.
    ///
    /// At most one update per activity is in flight. Toggles made while one
    /// is outstanding are sent as a single follow-up once it completes.
    pub fn toggle_completion(&mut self, identity: &Identity, id: &str) -> Option<bool> {
        let awaiting_create = self.awaiting_create.contains(id);
        let update_in_flight = self.updates.contains_key(id);
        let item = self.items.iter_mut().find(|a| a.id == id)?;
        item.is_completed = !item.is_completed;
        let is_completed = item.is_completed;

        // A pending create carries the flag over when it is confirmed.
        if !awaiting_create {
            item.sync = SyncStatus::Pending;
            if !update_in_flight {
                self.spawn_update(identity, id.to_string(), is_completed);
            }
        }

        Some(is_completed)
    }

    /// Drop local state. Writes already issued keep running; their results
    /// are discarded.
    pub fn clear(&mut self) {
        self.items.clear();
        self.in_flight.detach_all();
        self.awaiting_create.clear();
        self.orphaned.clear();
        self.updates.clear();
    }

    // ─── Remote completions ──────────────────────────────────────────────────

    /// Apply every remote write that has already completed, without waiting.
    pub fn poll_sync(&mut self) -> usize {
        let mut applied = 0;
        while let Some(joined) = self.in_flight.try_join_next() {
            self.apply_joined(joined);
            applied += 1;
        }
        applied
    }

    /// Wait for every in-flight remote write (including follow-ups) and
    /// apply the results.
    pub async fn settle(&mut self) -> usize {
        let mut applied = 0;
        while let Some(joined) = self.in_flight.join_next().await {
            self.apply_joined(joined);
            applied += 1;
        }
        applied
    }

    fn apply_joined(&mut self, joined: Result<SyncOutcome, JoinError>) {
        match joined {
            Ok(outcome) => self.apply(outcome),
            Err(e) => tracing::error!(error = %e, "Remote write task failed"),
        }
    }

    fn apply(&mut self, outcome: SyncOutcome) {
        match outcome {
            SyncOutcome::Created {
                local_id,
                identity,
                result,
            } => self.apply_created(local_id, &identity, result),
            SyncOutcome::Updated {
                id,
                identity,
                seq,
                sent,
                result,
            } => self.apply_updated(id, &identity, seq, sent, result),
            SyncOutcome::Deleted { id, result } => match result {
                Ok(()) => tracing::debug!(activity_id = %id, "Delete confirmed"),
                Err(e) => {
                    tracing::warn!(activity_id = %id, error = %e, "Delete failed; item stays removed locally")
                }
            },
        }
    }

    fn apply_updated(
        &mut self,
        id: String,
        identity: &Identity,
        seq: u64,
        sent: bool,
        result: Result<(), ApiError>,
    ) {
        if self.updates.get(&id) != Some(&seq) {
            // Superseded by a full load, or the entry was removed.
            return;
        }
        self.updates.remove(&id);

        let Some(item) = self.items.iter_mut().find(|a| a.id == id) else {
            return;
        };
        match result {
            Ok(()) if item.is_completed == sent => {
                tracing::debug!(activity_id = %id, "Completion update confirmed");
                item.sync = SyncStatus::Confirmed;
            }
            Ok(()) => {
                // Toggled again while this request was out.
                let is_completed = item.is_completed;
                tracing::debug!(activity_id = %id, is_completed, "Sending follow-up completion update");
                self.spawn_update(identity, id, is_completed);
            }
            Err(e) => {
                tracing::warn!(activity_id = %id, error = %e, "Completion update failed");
                item.sync = SyncStatus::Failed;
            }
        }
    }

    fn apply_created(
        &mut self,
        local_id: String,
        identity: &Identity,
        result: Result<Option<SavedActivity>, ApiError>,
    ) {
        if !self.awaiting_create.remove(&local_id) {
            // Superseded by a full load.
            return;
        }
        let orphaned = self.orphaned.remove(&local_id);

        match result {
            Ok(Some(server)) if orphaned => {
                tracing::debug!(activity_id = %server.id, "Deleting activity removed before create completed");
                self.spawn_delete(identity, server.id);
            }
            Ok(None) if orphaned => {
                tracing::warn!(local_id = %local_id, "Removed activity was created without an id; it stays on the server");
            }
            Err(e) if orphaned => {
                tracing::debug!(local_id = %local_id, error = %e, "Create of removed activity failed");
            }
            Ok(Some(server)) => {
                let Some(item) = self.items.iter_mut().find(|a| a.id == local_id) else {
                    return;
                };
                tracing::debug!(local_id = %local_id, activity_id = %server.id, "Create confirmed");
                item.id = server.id.clone();
                item.created_at = server.created_at;
                item.sync = SyncStatus::Confirmed;

                if item.is_completed != server.is_completed {
                    let is_completed = item.is_completed;
                    item.sync = SyncStatus::Pending;
                    self.spawn_update(identity, server.id, is_completed);
                }
            }
            Ok(None) => {
                let Some(item) = self.items.iter_mut().find(|a| a.id == local_id) else {
                    return;
                };
                tracing::debug!(local_id = %local_id, "Create confirmed without server id");
                item.sync = SyncStatus::Confirmed;
            }
            Err(e) => {
                tracing::warn!(local_id = %local_id, error = %e, "Create failed; keeping local entry");
                if let Some(item) = self.items.iter_mut().find(|a| a.id == local_id) {
                    item.sync = SyncStatus::Failed;
                }
            }
        }
    }

    fn spawn_update(&mut self, identity: &Identity, id: String, is_completed: bool) {
        self.next_update += 1;
        let seq = self.next_update;
        self.updates.insert(id.clone(), seq);

        let api = self.api.clone();
        let identity = identity.clone();
        self.in_flight.spawn(async move {
            let result = api.set_completed(&identity, &id, is_completed).await;
            SyncOutcome::Updated {
                id,
                identity,
                seq,
                sent: is_completed,
                result,
            }
        });
    }

    fn spawn_delete(&mut self, identity: &Identity, id: String) {
        let api = self.api.clone();
        let identity = identity.clone();
        self.in_flight.spawn(async move {
            let result = api.delete_activity(&identity, &id).await;
            SyncOutcome::Deleted { id, result }
        });
    }
}
