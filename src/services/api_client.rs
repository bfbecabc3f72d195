// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Remote Activity API client.
//!
//! The stores depend on the [`ActivityApi`] trait; [`HttpActivityApi`] is the
//! reqwest implementation. Every authenticated call asks the identity for a
//! fresh bearer token first.

use crate::error::ApiError;
use crate::models::{
    BackendGreeting, CandidateCard, CompletionUpdate, Identity, NewActivity, SavedActivity,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;

const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// Operations the client needs from the Activity API.
#[async_trait]
pub trait ActivityApi: Send + Sync + 'static {
    /// `GET /api/suggestions[?user_uid=..]`, in server ranking order.
    async fn suggestions(&self, user_uid: Option<&str>) -> Result<Vec<CandidateCard>, ApiError>;

    /// `GET /api/activities`
    async fn list_activities(&self, identity: &Identity) -> Result<Vec<SavedActivity>, ApiError>;

    /// `POST /api/activities`. Returns the stored activity when the server echoes it.
    async fn create_activity(
        &self,
        identity: &Identity,
        activity: &NewActivity,
    ) -> Result<Option<SavedActivity>, ApiError>;

    /// `PUT /api/activities/{id}`
    async fn set_completed(
        &self,
        identity: &Identity,
        id: &str,
        is_completed: bool,
    ) -> Result<(), ApiError>;

    /// `DELETE /api/activities/{id}`
    async fn delete_activity(&self, identity: &Identity, id: &str) -> Result<(), ApiError>;

    /// `GET /api/data`
    async fn greeting(&self, identity: &Identity) -> Result<BackendGreeting, ApiError>;
}

/// Activity API over HTTP.
#[derive(Clone)]
pub struct HttpActivityApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpActivityApi {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn activity_url(&self, id: &str) -> String {
        format!("{}/api/activities/{}", self.base_url, urlencoding::encode(id))
    }

    /// Attach a freshly fetched bearer token.
    async fn authed(
        &self,
        builder: reqwest::RequestBuilder,
        identity: &Identity,
    ) -> Result<reqwest::RequestBuilder, ApiError> {
        let token = identity.token().await?;
        Ok(builder.bearer_auth(token))
    }

    /// Send a request and fail on any non-2xx status.
    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }
        Ok(response)
    }

    async fn json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ActivityApi for HttpActivityApi {
    async fn suggestions(&self, user_uid: Option<&str>) -> Result<Vec<CandidateCard>, ApiError> {
        let mut request = self.http.get(self.url("/api/suggestions"));
        if let Some(uid) = user_uid {
            request = request.query(&[("user_uid", uid)]);
        }

        let response = self.send(request).await?;
        Self::json(response).await
    }

    async fn list_activities(&self, identity: &Identity) -> Result<Vec<SavedActivity>, ApiError> {
        let request = self
            .authed(self.http.get(self.url("/api/activities")), identity)
            .await?;
        let response = self.send(request).await?;
        Self::json(response).await
    }

    async fn create_activity(
        &self,
        identity: &Identity,
        activity: &NewActivity,
    ) -> Result<Option<SavedActivity>, ApiError> {
        let request = self
            .authed(
                self.http.post(self.url("/api/activities")).json(activity),
                identity,
            )
            .await?;
        let response = self.send(request).await?;

        let body = response.bytes().await?;
        if body.is_empty() {
            return Ok(None);
        }

        match serde_json::from_slice::<SavedActivity>(&body) {
            Ok(created) => Ok(Some(created)),
            Err(e) => {
                tracing::debug!(error = %e, "Create response carried no activity");
                Ok(None)
            }
        }
    }

    async fn set_completed(
        &self,
        identity: &Identity,
        id: &str,
        is_completed: bool,
    ) -> Result<(), ApiError> {
        let request = self
            .authed(
                self.http
                    .put(self.activity_url(id))
                    .json(&CompletionUpdate { is_completed }),
                identity,
            )
            .await?;
        self.send(request).await?;
        Ok(())
    }

    async fn delete_activity(&self, identity: &Identity, id: &str) -> Result<(), ApiError> {
        let request = self
            .authed(self.http.delete(self.activity_url(id)), identity)
            .await?;
        self.send(request).await?;
        Ok(())
    }

    async fn greeting(&self, identity: &Identity) -> Result<BackendGreeting, ApiError> {
        let request = self
            .authed(self.http.get(self.url("/api/data")), identity)
            .await?;
        let response = self.send(request).await?;
        Self::json(response).await
    }
}
