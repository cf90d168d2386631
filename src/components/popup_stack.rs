// ABOUTME: Popup stack showing the visible notification window and overflow count

use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::time::Instant;

use crate::app::AppState;
use crate::models::{NotificationType, PopupEntry};

const POPUP_HEIGHT: u16 = 4;

pub struct PopupStackComponent;

impl PopupStackComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let queue = state.center.queue();

        if queue.is_empty() {
            let empty = Paragraph::new("No new notifications")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title("Notifications"));
            frame.render_widget(empty, area);
            return;
        }

        let visible: Vec<&PopupEntry> = queue.visible().collect();
        let overflow = queue.overflow();

        let mut constraints: Vec<Constraint> = visible
            .iter()
            .map(|_| Constraint::Length(POPUP_HEIGHT))
            .collect();
        if overflow > 0 {
            constraints.push(Constraint::Length(1));
        }
        constraints.push(Constraint::Min(0));

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        let now = Instant::now();
        for (slot, entry) in visible.iter().enumerate() {
            self.render_popup(frame, chunks[slot], slot, entry, now);
        }

        if overflow > 0 {
            let more = Paragraph::new(format!("+{overflow} more"))
                .style(Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC))
                .alignment(Alignment::Right);
            frame.render_widget(more, chunks[visible.len()]);
        }
    }

    fn render_popup(&self, frame: &mut Frame, area: Rect, slot: usize, entry: &PopupEntry, now: Instant) {
        let metadata = entry.notification.metadata();
        let accent = accent_color(entry.notification.notification_type);

        let countdown = entry
            .remaining(now)
            .map(|left| format!(" {}s ", left.as_secs() + 1))
            .unwrap_or_default();

        let title = Line::from(vec![
            Span::styled(
                format!(" {} {} ", metadata.icon, metadata.label),
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("[{}] ", entry.received_at.format("%H:%M:%S")),
                Style::default().fg(Color::DarkGray),
            ),
        ]);

        let block = Block::default()
            .title(title)
            .title(
                ratatui::widgets::block::Title::from(format!(" {}:close{}", slot + 1, countdown))
                    .alignment(Alignment::Right),
            )
            .borders(Borders::ALL)
            .border_style(Style::default().fg(accent));

        let body = Paragraph::new(entry.notification.message.as_str())
            .block(block)
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(Color::White));

        frame.render_widget(body, area);
    }
}

fn accent_color(notification_type: NotificationType) -> Color {
    match notification_type {
        NotificationType::Credit | NotificationType::PaymentCompleted | NotificationType::UploadDone => Color::Green,
        NotificationType::Debit | NotificationType::Withdrawal => Color::Yellow,
        NotificationType::Rejected | NotificationType::UploadCancelled => Color::Red,
        NotificationType::EthProcessed => Color::Magenta,
        NotificationType::UploadProcessing => Color::Blue,
        NotificationType::NewBlog | NotificationType::ReportReply => Color::Cyan,
        NotificationType::Default => Color::Gray,
    }
}

impl Default for PopupStackComponent {
    fn default() -> Self {
        Self::new()
    }
}
