// ABOUTME: FIFO popup queue with per-entry auto-dismiss deadlines

use std::collections::VecDeque;
use std::time::Instant;

use crate::models::{Notification, PopupEntry};

#[derive(Debug)]
pub struct PresentationQueue {
    entries: VecDeque<PopupEntry>,
    max_visible: usize,
}

impl PresentationQueue {
    pub fn new(max_visible: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            max_visible: max_visible.max(1),
        }
    }

    /// Append a popup at the tail; its deadline starts at `now`.
    pub fn push(&mut self, notification: Notification, now: Instant) -> &PopupEntry {
        self.entries.push_back(PopupEntry::new(notification, now));
        &self.entries[self.entries.len() - 1]
    }

    /// Remove one popup by notification id.
    pub fn dismiss(&mut self, id: &str) -> Option<PopupEntry> {
        let index = self.entries.iter().position(|e| e.id() == id)?;
        self.entries.remove(index)
    }

    /// Remove the popup at `index` of the visible window.
    pub fn dismiss_visible(&mut self, index: usize) -> Option<PopupEntry> {
        if index >= self.max_visible {
            return None;
        }
        self.entries.remove(index)
    }

    pub fn dismiss_oldest(&mut self) -> Option<PopupEntry> {
        self.entries.pop_front()
    }

    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    /// Drop every popup whose deadline has passed, returning them in order.
    pub fn expire(&mut self, now: Instant) -> Vec<PopupEntry> {
        let mut expired = Vec::new();
        let mut kept = VecDeque::with_capacity(self.entries.len());
        for entry in self.entries.drain(..) {
            if entry.is_expired(now) {
                expired.push(entry);
            } else {
                kept.push_back(entry);
            }
        }
        self.entries = kept;
        expired
    }

    /// Entries rendered in full, oldest first.
    pub fn visible(&self) -> impl Iterator<Item = &PopupEntry> {
        self.entries.iter().take(self.max_visible)
    }

    /// Count shown as "+K more".
    pub fn overflow(&self) -> usize {
        self.entries.len().saturating_sub(self.max_visible)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().filter_map(PopupEntry::deadline).min()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PopupEntry> {
        self.entries.iter()
    }

    pub fn max_visible(&self) -> usize {
        self.max_visible
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NotificationType;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn note(id: &str, ty: NotificationType) -> Notification {
        Notification::new(id, format!("message {id}"), ty)
    }

    fn ids<'a>(entries: impl Iterator<Item = &'a PopupEntry>) -> Vec<String> {
        entries.map(|e| e.id().to_string()).collect()
    }

    #[test]
    fn window_shows_first_entries_and_counts_rest() {
        let now = Instant::now();
        let mut queue = PresentationQueue::new(3);
        for id in ["a", "b", "c", "d", "e"] {
            queue.push(note(id, NotificationType::Credit), now);
        }

        assert_eq!(ids(queue.visible()), vec!["a", "b", "c"]);
        assert_eq!(queue.overflow(), 2);
    }

    #[test]
    fn priority_does_not_reorder() {
        let now = Instant::now();
        let mut queue = PresentationQueue::new(3);
        queue.push(note("low", NotificationType::NewBlog), now);
        queue.push(note("high", NotificationType::Withdrawal), now);
        assert_eq!(ids(queue.visible()), vec!["low", "high"]);
    }

    #[test]
    fn auto_dismiss_after_display_time() {
        let t = Instant::now();
        let mut queue = PresentationQueue::new(3);
        // debit displays for 4000ms
        queue.push(note("d", NotificationType::Debit), t);

        assert!(queue.expire(t + Duration::from_millis(3999)).is_empty());
        assert_eq!(queue.len(), 1);

        let expired = queue.expire(t + Duration::from_millis(4001));
        assert_eq!(ids(expired.iter()), vec!["d"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn entries_expire_independently() {
        let t = Instant::now();
        let mut queue = PresentationQueue::new(3);
        queue.push(note("credit", NotificationType::Credit), t);
        queue.push(note("blog", NotificationType::NewBlog), t + Duration::from_millis(500));

        assert_eq!(queue.next_deadline(), Some(t + Duration::from_millis(3500)));
        let expired = queue.expire(t + Duration::from_millis(3600));
        assert_eq!(ids(expired.iter()), vec!["blog"]);
        assert_eq!(ids(queue.iter()), vec!["credit"]);
    }

    #[test]
    fn manual_dismiss_cancels_deadline() {
        let t = Instant::now();
        let mut queue = PresentationQueue::new(3);
        queue.push(note("a", NotificationType::Credit), t);
        queue.push(note("b", NotificationType::Credit), t);

        assert!(queue.dismiss("a").is_some());
        assert!(queue.dismiss("a").is_none());

        let expired = queue.expire(t + Duration::from_secs(10));
        assert_eq!(ids(expired.iter()), vec!["b"]);
    }

    #[test]
    fn dismiss_visible_ignores_hidden_slots() {
        let t = Instant::now();
        let mut queue = PresentationQueue::new(2);
        for id in ["a", "b", "c"] {
            queue.push(note(id, NotificationType::Credit), t);
        }
        assert!(queue.dismiss_visible(2).is_none());
        assert_eq!(queue.dismiss_visible(1).map(|e| e.id().to_string()), Some("b".into()));
        assert_eq!(ids(queue.visible()), vec!["a", "c"]);
        assert_eq!(queue.overflow(), 0);
    }
}
