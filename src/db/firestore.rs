// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed user operations.

use crate::db::{collections, UserStore};
use crate::error::AppError;
use crate::models::User;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Firestore field holding the last sign-in time.
const LAST_ACTIVITY_FIELD: &str = "lastActivity";

/// Keys the firestore client adds to every document it reads
/// (`_firestore_id`, `_firestore_created`, ...).
const FIRESTORE_METADATA_PREFIX: &str = "_firestore_";

/// A user document as read from Firestore.
///
/// The user ID is the document ID; documents written by other systems need
/// not repeat it in the body.
#[derive(Debug, Deserialize)]
struct UserDocument {
    #[serde(rename = "_firestore_id", default)]
    document_id: Option<String>,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl UserDocument {
    fn into_user(self) -> Result<User, AppError> {
        let mut fields = self.fields;
        fields.retain(|key, _| !key.starts_with(FIRESTORE_METADATA_PREFIX));
        if let Some(id) = self.document_id {
            fields.insert("id".to_string(), Value::String(id));
        }

        serde_json::from_value(Value::Object(fields))
            .map_err(|e| AppError::Database(format!("Malformed user document: {}", e)))
    }
}

/// Field-masked write of the sign-in timestamp.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LastActivityUpdate {
    last_activity: String,
}

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        // The emulator accepts any bearer token.
        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by document ID.
    pub async fn get_user(&self, id: &str) -> Result<Option<User>, AppError> {
        let document: Option<UserDocument> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        document.map(UserDocument::into_user).transpose()
    }

    /// Create or replace a user. Used for seeding; sign-in never creates users.
    ///
    /// The ID is stored only as the document ID, not as a body field.
    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        let Value::Object(mut fields) =
            serde_json::to_value(user).map_err(|e| AppError::Database(e.to_string()))?
        else {
            return Err(AppError::Database("User did not encode as an object".to_string()));
        };
        fields.remove("id");

        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.id)
            .object(&fields)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for FirestoreDb {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let email = email.to_string();

        let documents: Vec<UserDocument> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(move |q| q.field("email").eq(email.clone()))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        documents
            .into_iter()
            .next()
            .map(UserDocument::into_user)
            .transpose()
    }

    async fn update_last_activity(&self, id: &str, timestamp: &str) -> Result<User, AppError> {
        if self.get_user(id).await?.is_none() {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        // Only the timestamp is written; other fields keep whatever is stored.
        let document: UserDocument = self
            .get_client()?
            .fluent()
            .update()
            .fields([LAST_ACTIVITY_FIELD])
            .in_col(collections::USERS)
            .document_id(id)
            .object(&LastActivityUpdate {
                last_activity: timestamp.to_string(),
            })
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        document.into_user()
    }
}
