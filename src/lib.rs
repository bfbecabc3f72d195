// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity Match: swipe through activity suggestions and keep a list of
//! the ones you like.
//!
//! The [`client`] module holds the client state machine (session, feed,
//! saved list, swipe handling). The [`routes`] module serves an in-memory
//! Activity API for local development and tests.

pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::MemoryDb;
use services::SuggestionCatalog;

/// Shared state of the reference API server.
pub struct AppState {
    pub config: Config,
    pub db: MemoryDb,
    pub catalog: SuggestionCatalog,
}
