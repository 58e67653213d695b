// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer: the user store seam and its backends.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::InMemoryUserStore;

use crate::error::AppError;
use crate::models::User;
use async_trait::async_trait;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
}

/// Persistent lookup and update of user records.
///
/// Implementations provide their own concurrency control; concurrent
/// updates of the same user are last-write-wins.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find the user whose email exactly matches `email`.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Set `lastActivity` on the user with `id` and return the updated record.
    ///
    /// Returns [`AppError::NotFound`] if no such user exists.
    async fn update_last_activity(&self, id: &str, timestamp: &str) -> Result<User, AppError>;
}
