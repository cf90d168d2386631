// ABOUTME: Notification center owning all per-session delivery state
// Runs each polled batch through dedup, alert arbitration, and the popup queue

use std::time::Instant;
use tracing::{debug, info, warn};

use crate::config::AlertConfig;
use crate::delivery::dedup::Deduplicator;
use crate::delivery::priority::{Arbitration, PriorityArbitrator};
use crate::delivery::queue::PresentationQueue;
use crate::delivery::sink::AlertSink;
use crate::models::{Notification, PopupEntry};
use crate::poller::{ConnectionStatus, PollEvent};

/// What happened to one polled batch.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryReport {
    pub delivered: Vec<Notification>,
    pub dropped: usize,
    pub arbitration: Arbitration,
}

/// Created when the client starts and dropped on shutdown; nothing here
/// outlives the session.
pub struct NotificationCenter {
    dedup: Deduplicator,
    arbitrator: PriorityArbitrator,
    queue: PresentationQueue,
    sink: Box<dyn AlertSink>,
    unread_count: Option<u64>,
    status: ConnectionStatus,
}

impl NotificationCenter {
    pub fn new(config: &AlertConfig, sink: Box<dyn AlertSink>) -> Self {
        Self {
            dedup: Deduplicator::new(),
            arbitrator: PriorityArbitrator::new(config.sound_cooldown()),
            queue: PresentationQueue::new(config.max_visible),
            sink,
            unread_count: None,
            status: ConnectionStatus::Idle,
        }
    }

    /// Apply one event from the poller.
    pub fn handle_event(&mut self, event: PollEvent, now: Instant) -> Option<DeliveryReport> {
        match event {
            PollEvent::UnreadCount(count) => {
                self.unread_count = Some(count);
                None
            }
            PollEvent::Batch(batch) => Some(self.deliver_batch(batch, now)),
            PollEvent::Status(status) => {
                if status != self.status {
                    debug!(?status, "Connection status changed");
                }
                self.status = status;
                None
            }
        }
    }

    /// Deliver a batch: ids are recorded before anything is shown, then one
    /// alert for the whole batch, then one popup per accepted notification.
    pub fn deliver_batch(&mut self, batch: Vec<Notification>, now: Instant) -> DeliveryReport {
        let (accepted, dropped) = self.dedup.filter_batch(batch);
        let arbitration = self.arbitrator.arbitrate(&accepted, now);

        match &arbitration {
            Arbitration::Alert(plan) => {
                if let Err(e) = self.sink.play(plan) {
                    warn!("Failed to play alert: {}", e);
                }
            }
            Arbitration::Suppressed(priority) => {
                debug!(priority = priority.as_str(), "Alert skipped during cooldown");
            }
            Arbitration::Silent => {}
        }

        for notification in &accepted {
            self.queue.push(notification.clone(), now);
        }

        if !accepted.is_empty() {
            info!(
                "Delivered {} notifications ({} dropped, {} queued)",
                accepted.len(),
                dropped,
                self.queue.len()
            );
        }

        DeliveryReport {
            delivered: accepted,
            dropped,
            arbitration,
        }
    }

    /// Remove popups whose display time has run out.
    pub fn tick(&mut self, now: Instant) -> Vec<PopupEntry> {
        let expired = self.queue.expire(now);
        if !expired.is_empty() {
            debug!("Auto-dismissed {} popups", expired.len());
        }
        expired
    }

    pub fn dismiss(&mut self, id: &str) -> Option<PopupEntry> {
        self.queue.dismiss(id)
    }

    pub fn dismiss_oldest(&mut self) -> Option<PopupEntry> {
        self.queue.dismiss_oldest()
    }

    pub fn dismiss_visible(&mut self, index: usize) -> Option<PopupEntry> {
        self.queue.dismiss_visible(index)
    }

    pub fn clear_popups(&mut self) -> usize {
        self.queue.clear()
    }

    pub fn queue(&self) -> &PresentationQueue {
        &self.queue
    }

    pub fn unread_count(&self) -> Option<u64> {
        self.unread_count
    }

    pub fn status(&self) -> &ConnectionStatus {
        &self.status
    }

    pub fn set_status(&mut self, status: ConnectionStatus) {
        self.status = status;
    }

    pub fn delivered_count(&self) -> usize {
        self.dedup.len()
    }
}

impl std::fmt::Debug for NotificationCenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationCenter")
            .field("delivered", &self.dedup.len())
            .field("queued", &self.queue.len())
            .field("unread_count", &self.unread_count)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}
