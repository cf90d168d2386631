// ABOUTME: Main layout component arranging header, popup stack, and bottom menu bar

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
    style::{Color, Style},
};

use crate::app::AppState;
use super::{HeaderComponent, HelpComponent, PopupStackComponent};

pub struct LayoutComponent {
    header: HeaderComponent,
    popup_stack: PopupStackComponent,
    help: HelpComponent,
}

impl LayoutComponent {
    pub fn new() -> Self {
        Self {
            header: HeaderComponent::new(),
            popup_stack: PopupStackComponent::new(),
            help: HelpComponent::new(),
        }
    }

    pub fn render(&mut self, frame: &mut Frame, state: &AppState) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),  // Header with unread badge
                Constraint::Min(0),     // Popups
                Constraint::Length(3),  // Bottom menu bar
            ])
            .split(frame.size());

        self.header.render(frame, chunks[0], state);
        self.popup_stack.render(frame, chunks[1], state);
        self.render_menu_bar(frame, chunks[2]);

        if state.help_visible {
            self.help.render(frame, frame.size());
        }
    }

    fn render_menu_bar(&self, frame: &mut Frame, area: Rect) {
        let menu_text = "[x]dismiss [1-9]close [c]lear [p]ause [?]help [q]uit";

        let menu = Paragraph::new(menu_text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan))
            )
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center);

        frame.render_widget(menu, area);
    }
}

impl Default for LayoutComponent {
    fn default() -> Self {
        Self::new()
    }
}
