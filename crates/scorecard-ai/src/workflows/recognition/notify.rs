use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Recognition;

/// How many notifications the in-memory store retains per instance.
const RETAINED_NOTIFICATIONS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Recognition,
    AiSuggestion,
    Insight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationPriority {
    High,
    Normal,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub recipient_email: String,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
    pub priority: NotificationPriority,
}

static NOTIFICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_notification_id() -> String {
    let id = NOTIFICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("notif-{id:06}")
}

/// The fixed congratulations template: one notification per computed winner.
pub fn recognition_notification(
    recognition: &Recognition,
    timestamp: DateTime<Utc>,
) -> Notification {
    Notification {
        id: next_notification_id(),
        recipient_email: recognition.employee_email.clone(),
        kind: NotificationKind::Recognition,
        title: format!("Congratulations! You're {}!", recognition.award),
        message: format!(
            "You've been selected as {} for {} with a recognition score of {:.2}!",
            recognition.award, recognition.period, recognition.score
        ),
        timestamp,
        read: false,
        priority: NotificationPriority::High,
    }
}

/// Trait describing outbound notification hooks.
pub trait NotificationPublisher: Send + Sync {
    fn publish(&self, notification: Notification) -> Result<(), NotificationError>;
}

/// Notification dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// In-memory store keeping the most recent notifications, newest first. The
/// read flag only moves for the notification's own recipient.
#[derive(Debug, Default)]
pub struct InMemoryNotificationStore {
    notifications: Mutex<Vec<Notification>>,
}

impl InMemoryNotificationStore {
    pub fn notifications_for(&self, recipient_email: &str) -> Vec<Notification> {
        self.notifications
            .lock()
            .expect("notification mutex poisoned")
            .iter()
            .filter(|notification| notification.recipient_email == recipient_email)
            .cloned()
            .collect()
    }

    pub fn unread_count(&self, recipient_email: &str) -> usize {
        self.notifications
            .lock()
            .expect("notification mutex poisoned")
            .iter()
            .filter(|notification| {
                notification.recipient_email == recipient_email && !notification.read
            })
            .count()
    }

    /// Returns false when the notification does not exist or belongs to a
    /// different recipient.
    pub fn mark_read(&self, id: &str, recipient_email: &str) -> bool {
        let mut guard = self
            .notifications
            .lock()
            .expect("notification mutex poisoned");
        match guard.iter_mut().find(|notification| notification.id == id) {
            Some(notification) if notification.recipient_email == recipient_email => {
                notification.read = true;
                true
            }
            _ => false,
        }
    }
}

impl NotificationPublisher for InMemoryNotificationStore {
    fn publish(&self, notification: Notification) -> Result<(), NotificationError> {
        let mut guard = self
            .notifications
            .lock()
            .expect("notification mutex poisoned");
        guard.insert(0, notification);
        guard.truncate(RETAINED_NOTIFICATIONS);
        Ok(())
    }
}
