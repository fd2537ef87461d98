// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! SafePath API Server
//!
//! Stores emergency contacts and profiles and dispatches SOS alerts by SMS.

use safepath::{
    config::{Config, StoreBackend},
    db::{DocumentStore, FirestoreDb, MemoryDb},
    services::{SmsCapability, SmsGateway, UnavailableSms},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting SafePath API");

    let db: Arc<dyn DocumentStore> = match config.store_backend {
        StoreBackend::Firestore => Arc::new(FirestoreDb::new(&config.firebase_project_id).await?),
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory document store; data is lost on restart");
            Arc::new(MemoryDb::new())
        }
    };

    let sms: Arc<dyn SmsCapability> = match &config.sms_gateway_url {
        Some(url) => {
            tracing::info!(url = %url, "SMS gateway configured");
            Arc::new(SmsGateway::new(
                url.clone(),
                config.sms_gateway_token.clone(),
            ))
        }
        None => {
            tracing::warn!("SMS_GATEWAY_URL not set; SOS dispatch is unavailable");
            Arc::new(UnavailableSms)
        }
    };

    // Build shared state
    let state = Arc::new(AppState::new(config.clone(), db, sms));

    // Build router
    let app = safepath::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("safepath=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
