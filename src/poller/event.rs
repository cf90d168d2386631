// ABOUTME: Messages sent from the poll task to the notification center

use crate::models::Notification;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollEvent {
    UnreadCount(u64),
    /// New notifications from one poll, in server order
    Batch(Vec<Notification>),
    Status(ConnectionStatus),
}

/// Health of the polling loop, shown next to the unread badge.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    /// Not polling (no user, or not started yet)
    #[default]
    Idle,
    Online,
    Degraded { consecutive_failures: u32 },
}

impl ConnectionStatus {
    pub fn label(&self) -> String {
        match self {
            Self::Idle => "idle".to_string(),
            Self::Online => "online".to_string(),
            Self::Degraded { consecutive_failures } => {
                format!("stale ({consecutive_failures} failed polls)")
            }
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }
}

/// Whether the user can currently see the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
}
