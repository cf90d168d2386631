// ABOUTME: At-most-once filtering of polled notifications

use std::collections::HashSet;

use crate::models::{Notification, NotificationType};

/// Type delivered through the wallet's own local notification path.
pub const EXCLUDED_TYPE: NotificationType = NotificationType::EthProcessed;
/// Debits pointing here belong to the ETH withdrawal flow.
pub const EXCLUDED_DEBIT_LINK: &str = "/eth-wallet";
/// Debits mentioning this are ETH withdrawal echoes.
pub const EXCLUDED_DEBIT_MARKER: &str = "ETH withdrawal";

/// Outcome of checking one candidate against the delivered set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Duplicate,
    ExcludedType,
    ExcludedDebit,
}

/// Remembers which notification ids were already shown this session.
#[derive(Debug, Default)]
pub struct Deduplicator {
    delivered: HashSet<String>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify without recording anything.
    pub fn classify(&self, notification: &Notification) -> Verdict {
        if self.delivered.contains(&notification.id) {
            return Verdict::Duplicate;
        }
        if notification.notification_type == EXCLUDED_TYPE {
            return Verdict::ExcludedType;
        }
        if notification.notification_type == NotificationType::Debit {
            let link_excluded = notification.link.as_deref() == Some(EXCLUDED_DEBIT_LINK);
            if link_excluded || notification.message.contains(EXCLUDED_DEBIT_MARKER) {
                return Verdict::ExcludedDebit;
            }
        }
        Verdict::Accept
    }

    /// Keep accepted candidates in order and mark their ids delivered.
    ///
    /// Ids are recorded as soon as they are accepted, so a repeated id later
    /// in the same batch is dropped too.
    pub fn filter_batch(&mut self, batch: Vec<Notification>) -> (Vec<Notification>, usize) {
        let total = batch.len();
        let mut accepted = Vec::with_capacity(total);

        for notification in batch {
            match self.classify(&notification) {
                Verdict::Accept => {
                    self.delivered.insert(notification.id.clone());
                    accepted.push(notification);
                }
                verdict => {
                    tracing::debug!(id = %notification.id, ?verdict, "Dropping notification");
                }
            }
        }

        let dropped = total - accepted.len();
        (accepted, dropped)
    }

    pub fn is_delivered(&self, id: &str) -> bool {
        self.delivered.contains(id)
    }

    pub fn len(&self) -> usize {
        self.delivered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.delivered.is_empty()
    }
}
