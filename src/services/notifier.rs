// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sign-in email notifications.
//!
//! Two messages go out on every successful sign-in:
//! - a thank-you email to the user
//! - a sign-in notice to the administrator
//!
//! `HttpEmailNotifier` delivers through an HTTP email API (`POST /emails`,
//! bearer auth). `LogNotifier` only logs and is used for local development.

use crate::error::AppError;
use async_trait::async_trait;
use serde::Serialize;
use std::future::Future;
use std::time::Duration;

/// Outcome of a single notification send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationResult {
    pub success: bool,
}

impl NotificationResult {
    pub const SENT: Self = Self { success: true };
    pub const NOT_SENT: Self = Self { success: false };
}

/// Delivery of sign-in notifications.
///
/// An `Err` means the send could not be attempted (transport failure);
/// a rejected send is `Ok` with `success: false`.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_thank_you_email(
        &self,
        email: &str,
        display_name: &str,
        user_id: &str,
    ) -> Result<NotificationResult, AppError>;

    async fn send_admin_sign_in_notification(
        &self,
        display_name: &str,
        email: &str,
        user_id: &str,
    ) -> Result<NotificationResult, AppError>;
}

/// Which notification a send belongs to, for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    ThankYou,
    AdminSignIn,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::ThankYou => "thank_you",
            NotificationKind::AdminSignIn => "admin_sign_in",
        }
    }
}

/// Await a send for at most `limit`, collapsing errors and timeouts to `false`.
///
/// A send that exceeds the limit is dropped, which cancels it.
pub async fn send_bounded<F>(kind: NotificationKind, user_id: &str, limit: Duration, send: F) -> bool
where
    F: Future<Output = Result<NotificationResult, AppError>>,
{
    match tokio::time::timeout(limit, send).await {
        Ok(Ok(result)) => {
            if !result.success {
                tracing::warn!(kind = kind.as_str(), user_id, "Notification was not accepted");
            }
            result.success
        }
        Ok(Err(e)) => {
            tracing::warn!(kind = kind.as_str(), user_id, error = %e, "Notification failed");
            false
        }
        Err(_) => {
            tracing::warn!(
                kind = kind.as_str(),
                user_id,
                timeout_ms = limit.as_millis() as u64,
                "Notification timed out"
            );
            false
        }
    }
}

fn thank_you_subject() -> &'static str {
    "Thanks for signing in"
}

fn thank_you_text(display_name: &str) -> String {
    format!(
        "Hi {},\n\nThanks for signing in. We're glad to have you back.\n",
        display_name
    )
}

fn admin_subject(display_name: &str) -> String {
    format!("User sign-in: {}", display_name)
}

fn admin_text(display_name: &str, email: &str, user_id: &str) -> String {
    format!(
        "A user just signed in.\n\nName: {}\nEmail: {}\nUser ID: {}\n",
        display_name, email, user_id
    )
}

// ─── HTTP email API ──────────────────────────────────────────

/// Request body for `POST /emails`.
#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: &'a str,
}

/// Notifier that sends mail through an HTTP email API.
#[derive(Clone)]
pub struct HttpEmailNotifier {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    from: String,
    admin_email: String,
}

impl HttpEmailNotifier {
    pub fn new(base_url: String, api_key: String, from: String, admin_email: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            from,
            admin_email,
        }
    }

    /// Send one plain-text email.
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        text: &str,
    ) -> Result<NotificationResult, AppError> {
        let url = format!("{}/emails", self.base_url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&SendEmailRequest {
                from: &self.from,
                to: [to],
                subject,
                text,
            })
            .send()
            .await
            .map_err(|e| AppError::Notification(format!("Email API request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(NotificationResult::SENT);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), body = %body, "Email API rejected message");
        Ok(NotificationResult::NOT_SENT)
    }
}

#[async_trait]
impl Notifier for HttpEmailNotifier {
    async fn send_thank_you_email(
        &self,
        email: &str,
        display_name: &str,
        user_id: &str,
    ) -> Result<NotificationResult, AppError> {
        tracing::debug!(user_id, "Sending thank-you email");
        self.send_email(email, thank_you_subject(), &thank_you_text(display_name))
            .await
    }

    async fn send_admin_sign_in_notification(
        &self,
        display_name: &str,
        email: &str,
        user_id: &str,
    ) -> Result<NotificationResult, AppError> {
        if self.admin_email.is_empty() {
            tracing::warn!("No admin address configured, skipping sign-in notification");
            return Ok(NotificationResult::NOT_SENT);
        }

        tracing::debug!(user_id, "Sending admin sign-in notification");
        self.send_email(
            &self.admin_email,
            &admin_subject(display_name),
            &admin_text(display_name, email, user_id),
        )
        .await
    }
}

// ─── Logging notifier ────────────────────────────────────────

/// Local dev notifier that logs instead of sending real email.
#[derive(Clone, Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_thank_you_email(
        &self,
        email: &str,
        display_name: &str,
        user_id: &str,
    ) -> Result<NotificationResult, AppError> {
        tracing::info!(
            to = email,
            display_name,
            user_id,
            subject = thank_you_subject(),
            "Thank-you email (not sent)"
        );
        Ok(NotificationResult::SENT)
    }

    async fn send_admin_sign_in_notification(
        &self,
        display_name: &str,
        email: &str,
        user_id: &str,
    ) -> Result<NotificationResult, AppError> {
        tracing::info!(
            email,
            display_name,
            user_id,
            subject = %admin_subject(display_name),
            "Admin sign-in notification (not sent)"
        );
        Ok(NotificationResult::SENT)
    }
}
