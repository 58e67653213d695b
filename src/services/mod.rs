// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - outbound collaborators.

pub mod notifier;

pub use notifier::{
    send_bounded, HttpEmailNotifier, LogNotifier, NotificationKind, NotificationResult, Notifier,
};
