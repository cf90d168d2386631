// ABOUTME: Notification data model as issued by the marketplace backend
// Maps each notification type to its static priority and display metadata

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Alert priority, ordered from least to most urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    /// No notification type maps here yet; kept so the table can grow.
    Critical,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// Playback volume in `0.0..=1.0`.
    pub fn volume(&self) -> f32 {
        match self {
            Self::Low => 0.3,
            Self::Medium => 0.5,
            Self::High => 0.7,
            Self::Critical => 1.0,
        }
    }

    /// Vibration pattern as alternating on/off durations in milliseconds.
    pub fn vibration_pattern(&self) -> &'static [u64] {
        match self {
            Self::Low => &[100],
            Self::Medium => &[200, 100, 200],
            Self::High => &[300, 100, 300, 100, 300],
            Self::Critical => &[500, 200, 500, 200, 500],
        }
    }
}

/// Notification category as tagged by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum NotificationType {
    #[serde(rename = "transaction:credit")]
    Credit,
    #[serde(rename = "transaction:debit")]
    Debit,
    #[serde(rename = "payment:completed")]
    PaymentCompleted,
    #[serde(rename = "withdrawal")]
    Withdrawal,
    #[serde(rename = "rejected")]
    Rejected,
    #[serde(rename = "eth:processed")]
    EthProcessed,
    #[serde(rename = "upload:done")]
    UploadDone,
    #[serde(rename = "upload:processing")]
    UploadProcessing,
    #[serde(rename = "upload:cancelled")]
    UploadCancelled,
    #[serde(rename = "blog:new")]
    NewBlog,
    #[serde(rename = "report:reply")]
    ReportReply,
    #[default]
    #[serde(rename = "default", other)]
    Default,
}

/// Static presentation and alerting data for one notification type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeMetadata {
    pub priority: Priority,
    pub display_time: Duration,
    pub auto_close: bool,
    pub label: &'static str,
    pub icon: &'static str,
}

impl TypeMetadata {
    const fn new(priority: Priority, display_ms: u64, label: &'static str, icon: &'static str) -> Self {
        Self {
            priority,
            display_time: Duration::from_millis(display_ms),
            auto_close: true,
            label,
            icon,
        }
    }
}

impl NotificationType {
    pub fn metadata(&self) -> TypeMetadata {
        match self {
            Self::Credit => TypeMetadata::new(Priority::High, 5000, "Credit", "+"),
            Self::Debit => TypeMetadata::new(Priority::Medium, 4000, "Debit", "-"),
            Self::PaymentCompleted => TypeMetadata::new(Priority::High, 5000, "Payment completed", "✓"),
            Self::Withdrawal => TypeMetadata::new(Priority::High, 5000, "Withdrawal", "↑"),
            Self::Rejected => TypeMetadata::new(Priority::High, 5000, "Rejected", "✗"),
            Self::EthProcessed => TypeMetadata::new(Priority::High, 5000, "ETH processed", "Ξ"),
            Self::UploadDone => TypeMetadata::new(Priority::Medium, 4000, "Upload complete", "✓"),
            Self::UploadProcessing => TypeMetadata::new(Priority::Low, 3000, "Upload processing", "…"),
            Self::UploadCancelled => TypeMetadata::new(Priority::Medium, 4000, "Upload cancelled", "⊘"),
            Self::NewBlog => TypeMetadata::new(Priority::Low, 3000, "New blog post", "✎"),
            Self::ReportReply => TypeMetadata::new(Priority::Medium, 4000, "Report reply", "↩"),
            Self::Default => TypeMetadata::new(Priority::Low, 4000, "Notification", "•"),
        }
    }

    pub fn priority(&self) -> Priority {
        self.metadata().priority
    }
}

/// A notification as returned by the new-notifications endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "WireNotification")]
pub struct Notification {
    pub id: String,
    pub message: String,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Raw backend shape. Documents may carry `_id`, `id`, or both, and nullable fields.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireNotification {
    #[serde(default, rename = "_id")]
    object_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(rename = "type", default)]
    notification_type: Option<NotificationType>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

impl TryFrom<WireNotification> for Notification {
    type Error = String;

    fn try_from(wire: WireNotification) -> Result<Self, Self::Error> {
        let id = wire
            .object_id
            .or(wire.id)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| "notification has no id".to_string())?;
        Ok(Self {
            id,
            message: wire.message.unwrap_or_default(),
            notification_type: wire.notification_type.unwrap_or_default(),
            link: wire.link,
            created_at: wire.created_at,
        })
    }
}

impl Notification {
    pub fn new(id: impl Into<String>, message: impl Into<String>, notification_type: NotificationType) -> Self {
        Self {
            id: id.into(),
            message: message.into(),
            notification_type,
            link: None,
            created_at: None,
        }
    }

    #[must_use]
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn priority(&self) -> Priority {
        self.notification_type.priority()
    }

    pub fn metadata(&self) -> TypeMetadata {
        self.notification_type.metadata()
    }
}
