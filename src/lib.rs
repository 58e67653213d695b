// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! signin-api: email sign-in endpoint
//!
//! Looks a user up by email, refreshes their last-activity time, and sends
//! a thank-you email plus an admin sign-in notification.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::UserStore;
use services::Notifier;
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub users: Arc<dyn UserStore>,
    pub notifier: Arc<dyn Notifier>,
}
