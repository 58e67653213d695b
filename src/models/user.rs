//! User model for storage and API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// User account stored in the `users` collection.
///
/// Records are created elsewhere; sign-in only refreshes `last_activity`.
/// Stored fields this service does not model are kept in `extra` and
/// returned unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct User {
    /// Opaque user ID (also used as document ID)
    pub id: String,
    /// Email address, unique across users
    pub email: String,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// When the account was created (RFC 3339)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last sign-in timestamp (RFC 3339)
    #[serde(default)]
    pub last_activity: Option<String>,
    /// Any other stored fields
    #[serde(flatten)]
    #[cfg_attr(feature = "binding-generation", ts(skip))]
    pub extra: Map<String, Value>,
}

impl User {
    /// Name to greet the user with: `name` when set and non-empty,
    /// otherwise the part of the email before the first `@`.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => self.email.split('@').next().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: Option<&str>) -> User {
        User {
            id: "u1".to_string(),
            email: "alice@example.com".to_string(),
            name: name.map(str::to_string),
            created_at: None,
            last_activity: None,
            extra: Map::new(),
        }
    }

    #[test]
    fn test_display_name_prefers_name() {
        assert_eq!(user(Some("Alice Liddell")).display_name(), "Alice Liddell");
    }

    #[test]
    fn test_display_name_falls_back_to_local_part() {
        assert_eq!(user(None).display_name(), "alice");
        assert_eq!(user(Some("")).display_name(), "alice");
    }

    #[test]
    fn test_serializes_camel_case() {
        let mut u = user(None);
        u.last_activity = Some("2026-01-01T00:00:00.000Z".to_string());
        let json = serde_json::to_value(&u).unwrap();

        assert_eq!(json["lastActivity"], "2026-01-01T00:00:00.000Z");
        assert!(json["name"].is_null());
        assert!(json.get("createdAt").is_none());
    }

    #[test]
    fn test_unknown_stored_fields_pass_through() {
        let stored = serde_json::json!({
            "id": "u1",
            "email": "alice@example.com",
            "name": null,
            "lastActivity": null,
            "role": "admin",
            "points": 42
        });

        let user: User = serde_json::from_value(stored.clone()).unwrap();
        assert_eq!(user.extra.get("role"), Some(&Value::from("admin")));

        let out = serde_json::to_value(&user).unwrap();
        assert_eq!(out, stored);
    }
}
