// ABOUTME: End-to-end tests for poll events flowing through dedup, alerts, and the popup queue
// Exercises the app tick loop with both injected events and a live poller

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use market_alerts::api::NotificationApi;
use market_alerts::app::{App, AppState};
use market_alerts::config::AlertConfig;
use market_alerts::delivery::{AlertPlan, AlertSink, Arbitration, NotificationCenter};
use market_alerts::error::AlertError;
use market_alerts::models::{Notification, NotificationType, Priority};
use market_alerts::poller::PollEvent;
use pretty_assertions::assert_eq;

/// Records every alert it is asked to play.
#[derive(Clone, Default)]
struct RecordingSink {
    played: Arc<Mutex<Vec<Priority>>>,
}

impl RecordingSink {
    fn played(&self) -> Vec<Priority> {
        self.played.lock().unwrap().clone()
    }
}

impl AlertSink for RecordingSink {
    fn play(&mut self, plan: &AlertPlan) -> Result<(), AlertError> {
        self.played.lock().unwrap().push(plan.priority);
        Ok(())
    }
}

fn detached_app(sink: RecordingSink) -> (App, tokio::sync::mpsc::UnboundedSender<PollEvent>) {
    let center = NotificationCenter::new(&AlertConfig::default(), Box::new(sink));
    App::detached(AppState::new(center, Some("u-1".into())))
}

fn credit(id: &str) -> Notification {
    Notification::new(id, format!("credit {id}"), NotificationType::Credit)
}

fn queued_ids(app: &App) -> Vec<String> {
    app.state.center.queue().iter().map(|e| e.id().to_string()).collect()
}

#[test]
fn test_same_id_in_consecutive_polls_shows_once() {
    let sink = RecordingSink::default();
    let (mut app, tx) = detached_app(sink.clone());
    let t = Instant::now();

    tx.send(PollEvent::Batch(vec![credit("a")])).unwrap();
    let first = app.tick_at(t);
    tx.send(PollEvent::Batch(vec![credit("a")])).unwrap();
    let second = app.tick_at(t + Duration::from_secs(1));

    assert_eq!(first[0].delivered.len(), 1);
    assert!(second[0].delivered.is_empty());
    assert_eq!(second[0].dropped, 1);
    assert_eq!(queued_ids(&app), vec!["a"]);
    assert_eq!(sink.played(), vec![Priority::High]);
}

#[test]
fn test_overlapping_batches_deliver_each_id_once() {
    let sink = RecordingSink::default();
    let (mut app, tx) = detached_app(sink.clone());
    let t = Instant::now();

    tx.send(PollEvent::Batch(vec![credit("a"), credit("b")])).unwrap();
    tx.send(PollEvent::Batch(vec![credit("b"), credit("c"), credit("a")])).unwrap();
    let reports = app.tick_at(t);

    assert_eq!(reports.len(), 2);
    assert_eq!(queued_ids(&app), vec!["a", "b", "c"]);
    assert_eq!(app.state.center.delivered_count(), 3);
}

#[test]
fn test_excluded_type_never_queued_regardless_of_position() {
    let sink = RecordingSink::default();
    let (mut app, tx) = detached_app(sink.clone());
    let eth = |id: &str| Notification::new(id, "ETH processed", NotificationType::EthProcessed);

    tx.send(PollEvent::Batch(vec![eth("e1"), credit("a")])).unwrap();
    tx.send(PollEvent::Batch(vec![credit("b"), eth("e2")])).unwrap();
    tx.send(PollEvent::Batch(vec![eth("e3")])).unwrap();
    let reports = app.tick_at(Instant::now());

    assert_eq!(queued_ids(&app), vec!["a", "b"]);
    assert_eq!(reports[2].arbitration, Arbitration::Silent);
}

#[test]
fn test_cooldown_skips_sound_not_popups() {
    let sink = RecordingSink::default();
    let (mut app, tx) = detached_app(sink.clone());
    let t = Instant::now();

    tx.send(PollEvent::Batch(vec![credit("a")])).unwrap();
    app.tick_at(t);
    tx.send(PollEvent::Batch(vec![credit("b")])).unwrap();
    let reports = app.tick_at(t + Duration::from_millis(2000));

    assert_eq!(reports[0].arbitration, Arbitration::Suppressed(Priority::High));
    assert_eq!(sink.played().len(), 1);
    assert_eq!(queued_ids(&app), vec!["a", "b"]);

    tx.send(PollEvent::Batch(vec![credit("c")])).unwrap();
    app.tick_at(t + Duration::from_millis(3000));
    assert_eq!(sink.played().len(), 2);
}

#[test]
fn test_mixed_batch_alerts_once_at_highest_priority() {
    let sink = RecordingSink::default();
    let (mut app, tx) = detached_app(sink.clone());

    tx.send(PollEvent::Batch(vec![
        Notification::new("1", "new post", NotificationType::NewBlog),
        Notification::new("2", "withdrawal sent", NotificationType::Withdrawal),
        Notification::new("3", "reply", NotificationType::ReportReply),
    ]))
    .unwrap();
    app.tick_at(Instant::now());

    assert_eq!(sink.played(), vec![Priority::High]);
}

#[test]
fn test_popup_with_four_second_display_is_gone_after_it() {
    let sink = RecordingSink::default();
    let (mut app, tx) = detached_app(sink);
    let t = Instant::now();

    tx.send(PollEvent::Batch(vec![Notification::new("d", "debit", NotificationType::Debit)])).unwrap();
    app.tick_at(t);
    assert_eq!(queued_ids(&app), vec!["d"]);

    app.tick_at(t + Duration::from_millis(3999));
    assert_eq!(queued_ids(&app), vec!["d"]);

    app.tick_at(t + Duration::from_millis(4001));
    assert!(app.state.center.queue().is_empty());
}

#[test]
fn test_unread_count_follows_latest_event() {
    let (mut app, tx) = detached_app(RecordingSink::default());
    tx.send(PollEvent::UnreadCount(5)).unwrap();
    tx.send(PollEvent::UnreadCount(2)).unwrap();
    app.tick_at(Instant::now());
    assert_eq!(app.state.center.unread_count(), Some(2));
}

/// Returns the same notification on every poll.
#[derive(Clone)]
struct RepeatingApi;

impl NotificationApi for RepeatingApi {
    async fn unread_count(&self, _user_id: &str) -> Result<Option<u64>, AlertError> {
        Ok(Some(1))
    }

    async fn new_notifications(&self, _user_id: &str) -> Result<Vec<Notification>, AlertError> {
        Ok(vec![credit("same")])
    }
}

#[tokio::test(start_paused = true)]
async fn test_live_poller_repeating_id_yields_one_popup() {
    let sink = RecordingSink::default();
    let config = AlertConfig {
        user_id: Some("u-1".into()),
        ..AlertConfig::default()
    };
    let mut app = App::start(&config, RepeatingApi, Box::new(sink.clone()));
    assert!(app.is_polling());

    tokio::time::sleep(Duration::from_millis(1)).await;
    app.tick();
    tokio::time::sleep(Duration::from_millis(5_000)).await;
    app.tick();

    assert_eq!(queued_ids(&app), vec!["same"]);
    assert_eq!(sink.played().len(), 1);
    assert_eq!(app.state.center.unread_count(), Some(1));

    app.shutdown();
    assert!(!app.is_polling());
}
