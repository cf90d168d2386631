// ABOUTME: Background poll loop for unread counts and new notifications
// Pauses while the client is hidden and fetches immediately when shown again

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::api::NotificationApi;
use crate::config::AlertConfig;
use crate::error::AlertError;
use crate::poller::backoff::BackoffPolicy;
use crate::poller::event::{ConnectionStatus, PollEvent, Visibility};

pub struct Poller<A> {
    api: Arc<A>,
    user_id: Option<String>,
    interval: Duration,
    request_timeout: Option<Duration>,
    backoff: Option<BackoffPolicy>,
}

/// Result of one poll round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PollOutcome {
    Success,
    Failed,
    /// The event receiver is gone
    Closed,
}

impl<A: NotificationApi + 'static> Poller<A> {
    pub fn new(api: A, config: &AlertConfig) -> Self {
        Self {
            api: Arc::new(api),
            user_id: config.user_id.clone(),
            interval: config.poll_interval(),
            request_timeout: config.request_timeout(),
            backoff: config.backoff.map(BackoffPolicy::from),
        }
    }

    /// Start polling on a tokio task, initially visible.
    pub fn spawn(self, events: mpsc::UnboundedSender<PollEvent>) -> PollerHandle {
        let (visibility_tx, visibility_rx) = watch::channel(Visibility::Visible);
        let task = tokio::spawn(self.run(visibility_rx, events));
        PollerHandle {
            visibility: visibility_tx,
            task,
        }
    }

    /// Poll until the event receiver or the visibility sender is dropped.
    ///
    /// Rounds run one at a time, so a slow response delays the next tick
    /// instead of overlapping it.
    pub async fn run(
        self,
        mut visibility: watch::Receiver<Visibility>,
        events: mpsc::UnboundedSender<PollEvent>,
    ) {
        let Some(user_id) = self.user_id.clone() else {
            info!("No user id configured, notification polling disabled");
            return;
        };

        info!(
            "Starting notification polling for user {} every {:?}",
            user_id, self.interval
        );

        let mut failures: u32 = 0;
        let mut last_status: Option<ConnectionStatus> = None;

        loop {
            while *visibility.borrow_and_update() == Visibility::Hidden {
                if visibility.changed().await.is_err() {
                    return;
                }
            }
            debug!("Polling active");

            // First tick completes immediately.
            let mut ticker = interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let outcome = self.poll_once(&user_id, &events).await;
                        failures = match outcome {
                            PollOutcome::Closed => {
                                debug!("Event receiver dropped, stopping poller");
                                return;
                            }
                            PollOutcome::Success => 0,
                            PollOutcome::Failed => failures.saturating_add(1),
                        };

                        let status = if failures == 0 {
                            ConnectionStatus::Online
                        } else {
                            ConnectionStatus::Degraded { consecutive_failures: failures }
                        };
                        if last_status.as_ref() != Some(&status) {
                            if events.send(PollEvent::Status(status.clone())).is_err() {
                                return;
                            }
                            last_status = Some(status);
                        }

                        if let Some(delay) = self.backoff.and_then(|b| b.delay(failures)) {
                            if delay > self.interval {
                                warn!("{} consecutive poll failures, next poll in {:?}", failures, delay);
                                ticker.reset_after(delay);
                            }
                        }
                    }
                    changed = visibility.changed() => {
                        if changed.is_err() {
                            return;
                        }
                        if *visibility.borrow_and_update() == Visibility::Hidden {
                            debug!("Client hidden, pausing polling");
                            break;
                        }
                        // Hidden and shown again while a round was in flight
                        debug!("Client visible again, polling immediately");
                        ticker.reset_immediately();
                    }
                }
            }
        }
    }

    async fn poll_once(&self, user_id: &str, events: &mpsc::UnboundedSender<PollEvent>) -> PollOutcome {
        let (count, batch) = tokio::join!(
            self.with_timeout("unread-count", self.api.unread_count(user_id)),
            self.with_timeout("new-notifications", self.api.new_notifications(user_id)),
        );

        let mut outcome = PollOutcome::Success;

        match count {
            Ok(Some(count)) => {
                if events.send(PollEvent::UnreadCount(count)).is_err() {
                    return PollOutcome::Closed;
                }
            }
            Ok(None) => debug!("Unread count response had no count"),
            Err(e) => {
                warn!("Failed to fetch unread count: {}", e);
                outcome = PollOutcome::Failed;
            }
        }

        match batch {
            Ok(batch) if batch.is_empty() => {}
            Ok(batch) => {
                if events.send(PollEvent::Batch(batch)).is_err() {
                    return PollOutcome::Closed;
                }
            }
            Err(e) => {
                warn!("Failed to fetch new notifications: {}", e);
                outcome = PollOutcome::Failed;
            }
        }

        outcome
    }

    async fn with_timeout<T, F>(&self, endpoint: &str, request: F) -> Result<T, AlertError>
    where
        F: Future<Output = Result<T, AlertError>>,
    {
        match self.request_timeout {
            Some(limit) => tokio::time::timeout(limit, request)
                .await
                .map_err(|_| AlertError::Timeout(endpoint.to_string()))?,
            None => request.await,
        }
    }
}

/// Owner-side controls for a running poller; dropping it stops the task.
#[derive(Debug)]
pub struct PollerHandle {
    visibility: watch::Sender<Visibility>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Returns true if the visibility actually changed.
    pub fn set_visibility(&self, visibility: Visibility) -> bool {
        let changed = self.visibility.send_if_modified(|current| {
            if *current == visibility {
                false
            } else {
                *current = visibility;
                true
            }
        });
        if changed {
            debug!(?visibility, "Poller visibility updated");
        }
        changed
    }

    pub fn visibility(&self) -> Visibility {
        *self.visibility.borrow()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub fn stop(&self) {
        self.task.abort();
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
