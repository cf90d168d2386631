// ABOUTME: Notification polling with visibility-aware pause and resume

pub mod backoff;
pub mod event;
pub mod runner;

pub use backoff::BackoffPolicy;
pub use event::{ConnectionStatus, PollEvent, Visibility};
pub use runner::{Poller, PollerHandle};
