// ABOUTME: Popup entry shown on screen for a delivered notification
// Carries the auto-dismiss deadline derived from the notification type

use std::time::{Duration, Instant};

use super::Notification;

#[derive(Debug, Clone)]
pub struct PopupEntry {
    pub notification: Notification,
    pub auto_close: bool,
    pub inserted_at: Instant,
    pub received_at: chrono::DateTime<chrono::Local>,
    deadline: Option<Instant>,
}

impl PopupEntry {
    pub fn new(notification: Notification, now: Instant) -> Self {
        let metadata = notification.metadata();
        let deadline = metadata
            .auto_close
            .then(|| now + metadata.display_time);

        Self {
            notification,
            auto_close: metadata.auto_close,
            inserted_at: now,
            received_at: chrono::Local::now(),
            deadline,
        }
    }

    pub fn id(&self) -> &str {
        &self.notification.id
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }

    /// Time left before auto-dismiss, `None` for sticky popups.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NotificationType;

    #[test]
    fn deadline_comes_from_type_display_time() {
        let now = Instant::now();
        let entry = PopupEntry::new(Notification::new("a", "debit", NotificationType::Debit), now);

        assert!(entry.auto_close);
        assert_eq!(entry.deadline(), Some(now + Duration::from_millis(4000)));
        assert!(!entry.is_expired(now + Duration::from_millis(3999)));
        assert!(entry.is_expired(now + Duration::from_millis(4001)));
        assert_eq!(entry.remaining(now + Duration::from_millis(1000)), Some(Duration::from_millis(3000)));
    }
}
