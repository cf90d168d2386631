// ABOUTME: Application state and the glue between poller and notification center

use std::time::Instant;
use tokio::sync::mpsc;
use tracing::info;

use crate::api::NotificationApi;
use crate::config::AlertConfig;
use crate::delivery::{AlertSink, DeliveryReport, NotificationCenter};
use crate::poller::{PollEvent, Poller, PollerHandle, Visibility};

#[derive(Debug)]
pub struct AppState {
    pub center: NotificationCenter,
    pub user_id: Option<String>,
    pub should_quit: bool,
    pub help_visible: bool,
    /// Terminal focus as reported by crossterm
    pub focused: bool,
    pub paused_by_user: bool,
}

impl AppState {
    pub fn new(center: NotificationCenter, user_id: Option<String>) -> Self {
        Self {
            center,
            user_id,
            should_quit: false,
            help_visible: false,
            focused: true,
            paused_by_user: false,
        }
    }

    /// Polling runs only while focused and not paused from the keyboard.
    pub fn visibility(&self) -> Visibility {
        if self.focused && !self.paused_by_user {
            Visibility::Visible
        } else {
            Visibility::Hidden
        }
    }

    pub fn toggle_help(&mut self) {
        self.help_visible = !self.help_visible;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn toggle_pause(&mut self) {
        self.paused_by_user = !self.paused_by_user;
        info!(
            "Polling {} by user",
            if self.paused_by_user { "paused" } else { "resumed" }
        );
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    pub fn dismiss_oldest(&mut self) {
        self.center.dismiss_oldest();
    }

    /// `slot` is zero-based within the visible window.
    pub fn dismiss_slot(&mut self, slot: usize) {
        self.center.dismiss_visible(slot);
    }

    pub fn clear_popups(&mut self) {
        let cleared = self.center.clear_popups();
        if cleared > 0 {
            info!("Cleared {} popups", cleared);
        }
    }
}

pub struct App {
    pub state: AppState,
    poller: Option<PollerHandle>,
    events: mpsc::UnboundedReceiver<PollEvent>,
}

impl App {
    /// Build the app and start polling when a user is configured.
    pub fn start<A>(config: &AlertConfig, api: A, sink: Box<dyn AlertSink>) -> Self
    where
        A: NotificationApi + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let center = NotificationCenter::new(config, sink);
        let poller = config
            .user_id
            .as_ref()
            .map(|_| Poller::new(api, config).spawn(tx));

        Self {
            state: AppState::new(center, config.user_id.clone()),
            poller,
            events: rx,
        }
    }

    /// App without a poll task, fed through the returned sender.
    pub fn detached(state: AppState) -> (Self, mpsc::UnboundedSender<PollEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let app = Self {
            state,
            poller: None,
            events: rx,
        };
        (app, tx)
    }

    /// Drain poll events, expire popups, and push visibility to the poller.
    pub fn tick(&mut self) -> Vec<DeliveryReport> {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> Vec<DeliveryReport> {
        if let Some(poller) = &self.poller {
            poller.set_visibility(self.state.visibility());
        }

        let mut reports = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            if let Some(report) = self.state.center.handle_event(event, now) {
                reports.push(report);
            }
        }

        self.state.center.tick(now);
        reports
    }

    pub fn is_polling(&self) -> bool {
        self.poller.as_ref().is_some_and(|p| !p.is_finished())
    }

    pub fn shutdown(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.stop();
            info!("Notification polling stopped");
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.shutdown();
    }
}
