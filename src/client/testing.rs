// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process fakes for the client unit tests.

use crate::error::{ApiError, AuthError};
use crate::models::{
    BackendGreeting, CandidateCard, Identity, NewActivity, SavedActivity, SyncStatus,
};
use crate::services::identity::{IdentityChannel, IdentityProvider, StaticToken};
use crate::services::ActivityApi;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

pub fn card(id: &str) -> CandidateCard {
    CandidateCard {
        id: id.to_string(),
        title: format!("Activity {}", id),
        description: format!("Description of {}", id),
        icon: Some("✨".to_string()),
        color_theme: Some("#123456".to_string()),
    }
}

pub fn saved(id: &str, title: &str, is_completed: bool) -> SavedActivity {
    SavedActivity {
        id: id.to_string(),
        title: title.to_string(),
        description: String::new(),
        image_url: None,
        created_at: chrono::Utc::now(),
        is_completed,
        sync: SyncStatus::Confirmed,
    }
}

pub fn identity(uid: &str) -> Identity {
    Identity::new(
        uid,
        Some(format!("User {}", uid)),
        Some(format!("{}@example.com", uid)),
        None,
        Arc::new(StaticToken::new(format!("token-{}", uid))),
    )
}

#[derive(Default)]
struct FakeState {
    suggestions: Vec<CandidateCard>,
    /// Server-side saved lists per user, newest first.
    saved: HashMap<String, Vec<SavedActivity>>,
    next_id: u64,
    fail_reads: bool,
    fail_writes: bool,
    /// Extra latency for completion updates carrying this value.
    slow_completion: Option<(bool, Duration)>,
    last_user_uid: Option<String>,
}

/// Activity API fake with call counters, failure switches and a write gate.
#[derive(Clone)]
pub struct FakeApi {
    state: Arc<Mutex<FakeState>>,
    write_gate: watch::Sender<bool>,
    suggestion_calls: Arc<AtomicUsize>,
    list_calls: Arc<AtomicUsize>,
    update_calls: Arc<AtomicUsize>,
}

impl Default for FakeApi {
    fn default() -> Self {
        let (write_gate, _) = watch::channel(true);
        Self {
            state: Arc::default(),
            write_gate,
            suggestion_calls: Arc::default(),
            list_calls: Arc::default(),
            update_calls: Arc::default(),
        }
    }
}

impl FakeApi {
    pub fn with_suggestions(cards: Vec<CandidateCard>) -> Self {
        let api = Self::default();
        api.set_suggestions(cards);
        api
    }

    pub fn set_suggestions(&self, cards: Vec<CandidateCard>) {
        self.state.lock().unwrap().suggestions = cards;
    }

    pub fn seed_saved(&self, items: Vec<SavedActivity>) {
        // Seeds are shared by every user the tests sign in as.
        let mut state = self.state.lock().unwrap();
        state.saved.insert("*".to_string(), items);
    }

    pub fn seed_saved_for(&self, uid: &str, items: Vec<SavedActivity>) {
        let mut state = self.state.lock().unwrap();
        state.saved.insert(uid.to_string(), items);
    }

    /// Delay `PUT` requests that set `is_completed` to `value`.
    pub fn slow_completion(&self, value: bool, delay: Duration) {
        self.state.lock().unwrap().slow_completion = Some((value, delay));
    }

    pub fn fail_reads(&self, fail: bool) {
        self.state.lock().unwrap().fail_reads = fail;
    }

    pub fn fail_writes(&self, fail: bool) {
        self.state.lock().unwrap().fail_writes = fail;
    }

    /// Block writes until [`FakeApi::release_writes`].
    pub fn hold_writes(&self) {
        self.write_gate.send_replace(false);
    }

    pub fn release_writes(&self) {
        self.write_gate.send_replace(true);
    }

    pub fn last_user_uid(&self) -> Option<String> {
        self.state.lock().unwrap().last_user_uid.clone()
    }

    pub fn suggestion_calls(&self) -> usize {
        self.suggestion_calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn server_titles(&self, uid: &str) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state
            .saved
            .get(uid)
            .map(|list| list.iter().map(|a| a.title.clone()).collect())
            .unwrap_or_default()
    }

    pub fn server_completed(&self, uid: &str) -> Vec<bool> {
        let state = self.state.lock().unwrap();
        state
            .saved
            .get(uid)
            .map(|list| list.iter().map(|a| a.is_completed).collect())
            .unwrap_or_default()
    }

    async fn gate(&self) {
        let mut rx = self.write_gate.subscribe();
        // The sender lives in self, so the channel cannot close here.
        let _ = rx.wait_for(|open| *open).await;
    }

    fn check_writes(&self) -> Result<(), ApiError> {
        if self.state.lock().unwrap().fail_writes {
            return Err(ApiError::Status(503));
        }
        Ok(())
    }
}

#[async_trait]
impl ActivityApi for FakeApi {
    async fn suggestions(&self, user_uid: Option<&str>) -> Result<Vec<CandidateCard>, ApiError> {
        self.suggestion_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().unwrap();
        state.last_user_uid = user_uid.map(str::to_string);
        if state.fail_reads {
            return Err(ApiError::Status(502));
        }
        Ok(state.suggestions.clone())
    }

    async fn list_activities(&self, identity: &Identity) -> Result<Vec<SavedActivity>, ApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock().unwrap();
        if state.fail_reads {
            return Err(ApiError::Status(502));
        }
        Ok(state
            .saved
            .get(&identity.id)
            .or_else(|| state.saved.get("*"))
            .cloned()
            .unwrap_or_default())
    }

    async fn create_activity(
        &self,
        identity: &Identity,
        activity: &NewActivity,
    ) -> Result<Option<SavedActivity>, ApiError> {
        self.gate().await;
        self.check_writes()?;

        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let created = SavedActivity {
            id: format!("srv-{}", state.next_id),
            title: activity.title.clone(),
            description: activity.description.clone(),
            image_url: activity.image_url.clone(),
            created_at: chrono::Utc::now(),
            is_completed: false,
            sync: SyncStatus::Confirmed,
        };
        state
            .saved
            .entry(identity.id.clone())
            .or_default()
            .insert(0, created.clone());
        Ok(Some(created))
    }

    async fn set_completed(
        &self,
        identity: &Identity,
        id: &str,
        is_completed: bool,
    ) -> Result<(), ApiError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.gate().await;
        let slow = self.state.lock().unwrap().slow_completion;
        if let Some((value, delay)) = slow {
            if value == is_completed {
                tokio::time::sleep(delay).await;
            }
        }
        self.check_writes()?;

        let mut state = self.state.lock().unwrap();
        if let Some(item) = state
            .saved
            .get_mut(&identity.id)
            .and_then(|list| list.iter_mut().find(|a| a.id == id))
        {
            item.is_completed = is_completed;
        }
        Ok(())
    }

    async fn delete_activity(&self, identity: &Identity, id: &str) -> Result<(), ApiError> {
        self.gate().await;
        self.check_writes()?;

        let mut state = self.state.lock().unwrap();
        if let Some(list) = state.saved.get_mut(&identity.id) {
            list.retain(|a| a.id != id);
        }
        Ok(())
    }

    async fn greeting(&self, identity: &Identity) -> Result<BackendGreeting, ApiError> {
        if self.state.lock().unwrap().fail_reads {
            return Err(ApiError::Status(502));
        }
        Ok(BackendGreeting {
            message: "hello".to_string(),
            email: identity.email.clone(),
            user_uid: identity.id.clone(),
        })
    }
}

/// Identity provider fake driven by the test.
#[derive(Clone)]
pub struct FakeProvider {
    channel: Arc<IdentityChannel>,
    uid: Arc<Mutex<String>>,
    sign_in_error: Arc<Mutex<Option<String>>>,
}

impl FakeProvider {
    pub fn new(uid: &str) -> Self {
        Self {
            channel: Arc::new(IdentityChannel::new()),
            uid: Arc::new(Mutex::new(uid.to_string())),
            sign_in_error: Arc::default(),
        }
    }

    pub fn fail_next_sign_in(&self, reason: &str) {
        *self.sign_in_error.lock().unwrap() = Some(reason.to_string());
    }

    pub fn set_uid(&self, uid: &str) {
        *self.uid.lock().unwrap() = uid.to_string();
    }

    /// Simulate a provider-side change (session restored or expired).
    pub fn publish(&self, identity: Option<Identity>) {
        self.channel.publish(identity);
    }
}

#[async_trait]
impl IdentityProvider for FakeProvider {
    async fn sign_in(&self) -> Result<Identity, AuthError> {
        if let Some(reason) = self.sign_in_error.lock().unwrap().take() {
            return Err(AuthError::SignIn(reason));
        }
        let uid = self.uid.lock().unwrap().clone();
        let signed_in = identity(&uid);
        self.channel.publish(Some(signed_in.clone()));
        Ok(signed_in)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.channel.publish(None);
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.channel.subscribe()
    }
}
