// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

/// Which user store backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Firestore,
    Memory,
}

/// Which notifier delivers sign-in emails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifierBackend {
    /// Send through the HTTP email API.
    Http,
    /// Log messages instead of sending them.
    Log,
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Frontend URL (CORS origin)
    pub frontend_url: String,
    pub store_backend: StoreBackend,
    /// GCP project ID (Firestore)
    pub gcp_project_id: String,
    pub notifier_backend: NotifierBackend,
    /// Base URL of the email API
    pub email_api_url: String,
    /// Bearer key for the email API
    pub email_api_key: String,
    /// Sender address for outgoing mail
    pub email_from: String,
    /// Recipient of admin sign-in notifications
    pub admin_email: String,
    /// Upper bound on each notification send
    pub notify_timeout: Duration,
}

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";
const DEFAULT_EMAIL_API_URL: &str = "https://api.resend.com";
const DEFAULT_NOTIFY_TIMEOUT_MS: u64 = 10_000;

impl Config {
    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            port: DEFAULT_PORT,
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
            store_backend: StoreBackend::Memory,
            gcp_project_id: "test-project".to_string(),
            notifier_backend: NotifierBackend::Log,
            email_api_url: "http://localhost:9999".to_string(),
            email_api_key: "test_api_key".to_string(),
            email_from: "noreply@example.com".to_string(),
            admin_email: "admin@example.com".to_string(),
            notify_timeout: Duration::from_millis(500),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is loaded first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let store_backend = match env::var("USER_STORE").as_deref() {
            Err(_) | Ok("firestore") => StoreBackend::Firestore,
            Ok("memory") => StoreBackend::Memory,
            Ok(_) => return Err(ConfigError::Invalid("USER_STORE")),
        };

        let notifier_backend = match env::var("NOTIFIER").as_deref() {
            Err(_) | Ok("http") => NotifierBackend::Http,
            Ok("log") => NotifierBackend::Log,
            Ok(_) => return Err(ConfigError::Invalid("NOTIFIER")),
        };

        // The HTTP notifier cannot work without credentials and a recipient.
        let required_for_http = |name: &'static str| -> Result<String, ConfigError> {
            match env::var(name) {
                Ok(v) => Ok(v.trim().to_string()),
                Err(_) if notifier_backend == NotifierBackend::Log => Ok(String::new()),
                Err(_) => Err(ConfigError::Missing(name)),
            }
        };

        Ok(Self {
            port: parse_or("PORT", DEFAULT_PORT)?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| DEFAULT_FRONTEND_URL.to_string()),
            store_backend,
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            notifier_backend,
            email_api_url: env::var("EMAIL_API_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_EMAIL_API_URL.to_string()),
            email_api_key: required_for_http("EMAIL_API_KEY")?,
            email_from: env::var("EMAIL_FROM").unwrap_or_else(|_| "noreply@localhost".to_string()),
            admin_email: required_for_http("ADMIN_EMAIL")?,
            notify_timeout: Duration::from_millis(parse_or(
                "NOTIFY_TIMEOUT_MS",
                DEFAULT_NOTIFY_TIMEOUT_MS,
            )?),
        })
    }
}

/// Parse an optional numeric variable, falling back to `default` when unset.
fn parse_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(v) => v.trim().parse().map_err(|_| ConfigError::Invalid(name)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
