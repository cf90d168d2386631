// ABOUTME: Marketplace notification API access

pub mod client;
pub mod protocol;

pub use client::{HttpNotificationApi, NotificationApi};
pub use protocol::{NewNotificationsResponse, UnreadCountResponse};
