//! Single-slot notification store backing the toast/snackbar surface.
//!
//! # Design
//! - One visible message at a time; `show` replaces whatever is displayed.
//! - `close` only flips visibility so exit animations keep their text.
//! - Nothing is persisted.
//! - The slot is the [`NotificationState`] slice of the injected context.

use serde::{Deserialize, Serialize};

use crate::core::store::{Context, Slice, Store, SubscriptionId};

/// Visual severity of a notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Failure that needs attention.
    Error,
    /// Degraded but recoverable condition.
    Warning,
    /// Neutral information.
    Info,
    /// Completed action.
    Success,
}

impl Severity {
    /// CSS-friendly identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Success => "success",
        }
    }
}

/// Currently displayed notification.
#[derive(Clone, Debug, Default, PartialEq, Eq, Store)]
pub struct NotificationState {
    /// Message text; empty until the first `show`.
    pub message: String,
    /// Severity; `None` until the first `show`.
    pub severity: Option<Severity>,
    /// Whether the notification is on screen.
    pub visible: bool,
}

/// Observable single-slot notification queue.
#[derive(Clone, Debug)]
pub struct NotificationStore {
    state: Slice<NotificationState>,
}

impl NotificationStore {
    /// Store in `cx` with an empty, hidden notification.
    #[must_use]
    pub fn new(cx: &Context) -> Self {
        Self {
            state: Slice::with_state(cx, NotificationState::default()),
        }
    }

    /// Replace the notification and make it visible.
    pub fn show(&self, message: impl Into<String>, severity: Severity) {
        let message = message.into();
        tracing::debug!(severity = severity.as_str(), "notification shown");
        self.state.set(NotificationState {
            message,
            severity: Some(severity),
            visible: true,
        });
    }

    /// Hide the notification, keeping its message and severity.
    pub fn close(&self) {
        self.state.update(|state| state.visible = false);
    }

    /// Snapshot of the current notification.
    #[must_use]
    pub fn state(&self) -> NotificationState {
        self.state.get()
    }

    /// Observe notification changes.
    pub fn subscribe(&self, listener: impl Fn(&NotificationState) + 'static) -> SubscriptionId {
        self.state.subscribe(listener)
    }

    /// Stop observing.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.state.unsubscribe(id)
    }
}
