// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authenticated identity issued by the identity provider.

use crate::error::AuthError;
use crate::services::identity::TokenSource;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Signed-in user as seen by the client.
///
/// The bearer token is not stored here: [`Identity::token`] asks the
/// provider for one right before each authenticated call.
#[derive(Clone)]
pub struct Identity {
    pub id: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub photo_url: Option<String>,
    tokens: Arc<dyn TokenSource>,
}

impl Identity {
    pub fn new(
        id: impl Into<String>,
        display_name: Option<String>,
        email: Option<String>,
        photo_url: Option<String>,
        tokens: Arc<dyn TokenSource>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name,
            email,
            photo_url,
            tokens,
        }
    }

    /// Fetch a bearer token for the next authenticated request.
    pub async fn token(&self) -> Result<String, AuthError> {
        self.tokens.token().await
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("id", &self.id)
            .field("display_name", &self.display_name)
            .field("email", &self.email)
            .field("photo_url", &self.photo_url)
            .finish_non_exhaustive()
    }
}

/// Response of `GET /api/data`: the backend echoing who it thinks the caller is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendGreeting {
    pub message: String,
    pub email: Option<String>,
    pub user_uid: String,
}
