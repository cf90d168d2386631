// ABOUTME: Core data models for notifications and the popups they produce

pub mod notification;
pub mod popup;

pub use notification::{Notification, NotificationType, Priority, TypeMetadata};
pub use popup::PopupEntry;
