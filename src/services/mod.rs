// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - external boundaries and server-side catalog.

pub mod api_client;
pub mod catalog;
pub mod firebase;
pub mod identity;

pub use api_client::{ActivityApi, HttpActivityApi};
pub use catalog::SuggestionCatalog;
pub use firebase::FirebaseAuth;
pub use identity::{
    DevIdentityProvider, DevProfile, IdentityChannel, IdentityProvider, StaticToken, TokenSource,
};
