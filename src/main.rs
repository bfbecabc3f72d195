// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity Match reference API server
//!
//! Serves suggestions and per-user saved activities from memory so the
//! client can be run and tested without the hosted backend.

use activity_match::{config::Config, db::MemoryDb, services::SuggestionCatalog, AppState};
use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured JSON logging
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(port = config.port, "Starting Activity Match API");

    // Load suggestion catalog
    let catalog = match &config.suggestions_path {
        Some(path) => {
            tracing::info!(path = %path, "Loading suggestion catalog");
            SuggestionCatalog::load_from_file(path)
                .with_context(|| format!("Failed to load suggestions from {}", path))?
        }
        None => SuggestionCatalog::default(),
    };
    tracing::info!(count = catalog.cards().len(), "Suggestion catalog loaded");

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db: MemoryDb::new(),
        catalog,
    });

    // Build router
    let app = activity_match::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> anyhow::Result<()> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("activity_match=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
