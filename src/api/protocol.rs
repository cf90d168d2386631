// ABOUTME: Response envelopes for the notification REST endpoints
// Tolerates missing fields so malformed payloads degrade to "nothing new"

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::models::Notification;

/// Body of the unread-count endpoint: `{ "success": true, "count": 3 }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnreadCountResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub count: Option<u64>,
}

impl UnreadCountResponse {
    /// The count, or `None` when the server did not report success.
    pub fn into_count(self) -> Option<u64> {
        match self.success {
            Some(true) => self.count,
            _ => None,
        }
    }
}

/// Body of the new-notifications endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNotificationsResponse {
    #[serde(default)]
    pub success: Option<bool>,
    /// Raw items, decoded one by one in `into_batch`
    #[serde(default)]
    pub new_notifications: Option<Vec<Value>>,
}

impl NewNotificationsResponse {
    /// Notifications in server order; empty unless `success` is true.
    /// Entries that fail to decode are skipped with a warning.
    pub fn into_batch(self) -> Vec<Notification> {
        let items = match (self.success, self.new_notifications) {
            (Some(true), Some(items)) => items,
            _ => return Vec::new(),
        };

        items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| match serde_json::from_value::<Notification>(item) {
                Ok(notification) => Some(notification),
                Err(e) => {
                    warn!("Skipping malformed notification at index {}: {}", index, e);
                    None
                }
            })
            .collect()
    }
}
