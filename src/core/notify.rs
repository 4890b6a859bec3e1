//! Notification sink for user-facing outcomes of bulk actions

use serde::Serialize;
use std::fmt;
use std::sync::Mutex;

/// Kind of user-facing notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationKind::Success => write!(f, "success"),
            NotificationKind::Error => write!(f, "error"),
        }
    }
}

/// Receives toast-style notifications
pub trait NotificationSink: Send + Sync {
    fn notify(&self, kind: NotificationKind, message: &str);
}

/// Sink that turns notifications into tracing events
#[derive(Debug, Clone, Default)]
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn notify(&self, kind: NotificationKind, message: &str) {
        match kind {
            NotificationKind::Success => tracing::info!(%kind, "{}", message),
            NotificationKind::Error => tracing::error!(%kind, "{}", message),
        }
    }
}

/// Sink that keeps every notification, in order
#[derive(Debug, Default)]
pub struct CollectingNotifier {
    received: Mutex<Vec<(NotificationKind, String)>>,
}

impl CollectingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications received so far
    pub fn received(&self) -> Vec<(NotificationKind, String)> {
        self.received
            .lock()
            .map(|received| received.clone())
            .unwrap_or_default()
    }
}

impl NotificationSink for CollectingNotifier {
    fn notify(&self, kind: NotificationKind, message: &str) {
        if let Ok(mut received) = self.received.lock() {
            received.push((kind, message.to_string()));
        }
    }
}
