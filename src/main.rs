// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! signin-api server
//!
//! Serves the email sign-in endpoint backed by Firestore (or an in-memory
//! store for local development) and an HTTP email API.

use signin_api::{
    config::{Config, NotifierBackend, StoreBackend},
    db::{FirestoreDb, InMemoryUserStore, UserStore},
    services::{HttpEmailNotifier, LogNotifier, Notifier},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting signin-api");

    let users: Arc<dyn UserStore> = match config.store_backend {
        StoreBackend::Firestore => Arc::new(FirestoreDb::new(&config.gcp_project_id).await?),
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory user store; data is lost on restart");
            Arc::new(InMemoryUserStore::new())
        }
    };

    let notifier: Arc<dyn Notifier> = match config.notifier_backend {
        NotifierBackend::Http => {
            tracing::info!(api = %config.email_api_url, "Email notifications enabled");
            Arc::new(HttpEmailNotifier::new(
                config.email_api_url.clone(),
                config.email_api_key.clone(),
                config.email_from.clone(),
                config.admin_email.clone(),
            ))
        }
        NotifierBackend::Log => {
            tracing::info!("Email notifications are logged, not sent");
            Arc::new(LogNotifier)
        }
    };

    let state = Arc::new(AppState {
        config: config.clone(),
        users,
        notifier,
    });

    let app = signin_api::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("signin_api=debug,info"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
