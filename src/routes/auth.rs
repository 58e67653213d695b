// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Email sign-in route.
//!
//! Sign-in looks the user up by email only; no credential is checked.

use axum::{body::Bytes, extract::State, routing::post, Json, Router};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::{Arc, LazyLock};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::models::User;
use crate::services::{send_bounded, NotificationKind};
use crate::time_utils::now_rfc3339;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/auth/signin", post(sign_in))
}

/// `local@domain.tld`: no whitespace, exactly one `@`, a `.` somewhere after it.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// Successful sign-in response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SignInResponse {
    pub message: String,
    pub user: User,
    pub thank_you_email_sent: bool,
    pub admin_notification_sent: bool,
}

/// Pull the email out of a sign-in body and check its shape.
fn extract_email(body: &[u8]) -> Result<String> {
    let body: Value = serde_json::from_slice(body).map_err(|e| {
        tracing::warn!(error = %e, "Sign-in body is not valid JSON");
        AppError::InvalidJson
    })?;

    let email = match body.get("email") {
        Some(Value::String(email)) if !email.is_empty() => email,
        other => {
            tracing::warn!(
                email_type = json_type_name(other),
                "Sign-in email missing or not a string"
            );
            return Err(AppError::EmailRequired);
        }
    };

    if !EMAIL_PATTERN.is_match(email) {
        return Err(AppError::InvalidEmailFormat);
    }

    Ok(email.clone())
}

fn json_type_name(value: Option<&Value>) -> &'static str {
    match value {
        None | Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "boolean",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
        Some(Value::Array(_)) => "array",
        Some(Value::Object(_)) => "object",
    }
}

/// Sign a user in by email, refresh their activity time, and notify.
async fn sign_in(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Json<SignInResponse>> {
    let email = extract_email(&body)?;
    tracing::debug!(email = %email, "Sign-in attempt");

    let Some(user) = state.users.find_user_by_email(&email).await? else {
        tracing::info!("Sign-in for unknown email");
        return Err(AppError::NotFound("User not found".to_string()));
    };

    let user = state
        .users
        .update_last_activity(&user.id, &now_rfc3339())
        .await?;

    let display_name = user.display_name().to_string();
    let timeout = state.config.notify_timeout;

    // Sends run one after the other; each reports its own outcome.
    let thank_you_email_sent = send_bounded(
        NotificationKind::ThankYou,
        &user.id,
        timeout,
        state
            .notifier
            .send_thank_you_email(&user.email, &display_name, &user.id),
    )
    .await;

    let admin_notification_sent = send_bounded(
        NotificationKind::AdminSignIn,
        &user.id,
        timeout,
        state
            .notifier
            .send_admin_sign_in_notification(&display_name, &user.email, &user.id),
    )
    .await;

    tracing::info!(
        user_id = %user.id,
        thank_you_email_sent,
        admin_notification_sent,
        "Sign-in successful"
    );

    Ok(Json(SignInResponse {
        message: "Login successful".to_string(),
        user,
        thank_you_email_sent,
        admin_notification_sent,
    }))
}
