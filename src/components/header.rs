// ABOUTME: Header bar with the unread badge and polling status

use ratatui::{
    prelude::*,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
};

use crate::app::AppState;
use crate::poller::{ConnectionStatus, Visibility};

pub struct HeaderComponent;

impl HeaderComponent {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let status = state.center.status();

        // Keep showing the last count while polls fail.
        let badge = match state.center.unread_count() {
            Some(0) => Span::styled("no unread", Style::default().fg(Color::DarkGray)),
            Some(count) => Span::styled(
                format!("● {count} unread"),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            None => Span::styled("unread: -", Style::default().fg(Color::DarkGray)),
        };

        let (status_text, status_color) = if state.user_id.is_none() {
            ("no user configured".to_string(), Color::DarkGray)
        } else if state.visibility() == Visibility::Hidden {
            ("paused".to_string(), Color::Yellow)
        } else {
            let color = match status {
                ConnectionStatus::Online => Color::Green,
                ConnectionStatus::Degraded { .. } => Color::Yellow,
                ConnectionStatus::Idle => Color::DarkGray,
            };
            (status.label(), color)
        };

        let mut spans = vec![
            badge,
            Span::raw("  "),
            Span::styled(status_text, Style::default().fg(status_color)),
        ];
        if let Some(user) = &state.user_id {
            spans.push(Span::styled(format!("  user {user}"), Style::default().fg(Color::Gray)));
        }

        let header = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .title("Market Alerts")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );

        frame.render_widget(header, area);
    }
}

impl Default for HeaderComponent {
    fn default() -> Self {
        Self::new()
    }
}
