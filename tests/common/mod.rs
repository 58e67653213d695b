// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, Response};
use signin_api::config::Config;
use signin_api::db::{FirestoreDb, InMemoryUserStore, UserStore};
use signin_api::error::AppError;
use signin_api::models::User;
use signin_api::routes::create_router;
use signin_api::services::{NotificationResult, Notifier};
use signin_api::AppState;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::ServiceExt;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// How the mock notifier answers one kind of send.
#[derive(Clone, Copy, Debug)]
#[allow(dead_code)]
pub enum Behavior {
    Succeed,
    Reject,
    Fail,
    Hang,
}

impl Behavior {
    async fn run(self) -> Result<NotificationResult, AppError> {
        match self {
            Behavior::Succeed => Ok(NotificationResult { success: true }),
            Behavior::Reject => Ok(NotificationResult { success: false }),
            Behavior::Fail => Err(AppError::Notification("email API down".to_string())),
            Behavior::Hang => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(NotificationResult { success: true })
            }
        }
    }
}

/// A notification the mock notifier was asked to send.
#[derive(Clone, Debug, PartialEq)]
pub struct SentNotification {
    pub kind: &'static str,
    pub email: String,
    pub display_name: String,
    pub user_id: String,
}

/// Notifier that records calls and answers with a fixed behavior per kind.
pub struct RecordingNotifier {
    thank_you: Behavior,
    admin: Behavior,
    sent: Mutex<Vec<SentNotification>>,
}

#[allow(dead_code)]
impl RecordingNotifier {
    pub fn new(thank_you: Behavior, admin: Behavior) -> Self {
        Self {
            thank_you,
            admin,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<SentNotification> {
        self.sent.lock().unwrap().clone()
    }

    fn record(&self, kind: &'static str, email: &str, display_name: &str, user_id: &str) {
        self.sent.lock().unwrap().push(SentNotification {
            kind,
            email: email.to_string(),
            display_name: display_name.to_string(),
            user_id: user_id.to_string(),
        });
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_thank_you_email(
        &self,
        email: &str,
        display_name: &str,
        user_id: &str,
    ) -> Result<NotificationResult, AppError> {
        self.record("thank_you", email, display_name, user_id);
        self.thank_you.run().await
    }

    async fn send_admin_sign_in_notification(
        &self,
        display_name: &str,
        email: &str,
        user_id: &str,
    ) -> Result<NotificationResult, AppError> {
        self.record("admin", email, display_name, user_id);
        self.admin.run().await
    }
}

/// Handles into a test app's collaborators.
#[allow(dead_code)]
pub struct TestApp {
    pub router: axum::Router,
    pub store: Arc<InMemoryUserStore>,
    pub notifier: Arc<RecordingNotifier>,
}

/// Create a test app with an in-memory store and the given notifier.
#[allow(dead_code)]
pub fn create_test_app_with(notifier: RecordingNotifier) -> TestApp {
    let store = Arc::new(InMemoryUserStore::new());
    let notifier = Arc::new(notifier);

    let state = Arc::new(AppState {
        config: Config::test_default(),
        users: store.clone(),
        notifier: notifier.clone(),
    });

    TestApp {
        router: create_router(state),
        store,
        notifier,
    }
}

/// Create a test app whose notifications all succeed.
#[allow(dead_code)]
pub fn create_test_app() -> TestApp {
    create_test_app_with(RecordingNotifier::new(Behavior::Succeed, Behavior::Succeed))
}

/// Create a router over an arbitrary store, with succeeding notifications.
#[allow(dead_code)]
pub fn create_router_with_store(users: Arc<dyn UserStore>) -> axum::Router {
    let state = Arc::new(AppState {
        config: Config::test_default(),
        users,
        notifier: Arc::new(RecordingNotifier::new(Behavior::Succeed, Behavior::Succeed)),
    });
    create_router(state)
}

/// Helper to create a basic test user.
#[allow(dead_code)]
pub fn test_user(id: &str, email: &str, name: Option<&str>) -> User {
    User {
        id: id.to_string(),
        email: email.to_string(),
        name: name.map(str::to_string),
        created_at: Some("2025-06-01T12:00:00.000Z".to_string()),
        last_activity: None,
        extra: Default::default(),
    }
}

/// POST a raw body to the sign-in endpoint.
#[allow(dead_code)]
pub async fn post_signin(router: &axum::Router, body: &str) -> Response<Body> {
    router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/signin")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
