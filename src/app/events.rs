// ABOUTME: Event handling system for keyboard input, focus changes, and app actions

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crate::app::AppState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Quit,
    ToggleHelp,
    DismissOldest,
    DismissSlot(usize),   // zero-based slot in the visible window
    ClearPopups,
    TogglePause,
    FocusGained,
    FocusLost,
}

pub struct EventHandler;

impl EventHandler {
    pub fn handle_key_event(key_event: KeyEvent, state: &mut AppState) -> Option<AppEvent> {
        if state.help_visible {
            return match key_event.code {
                KeyCode::Char('?') | KeyCode::Esc => Some(AppEvent::ToggleHelp),
                _ => None,
            };
        }

        match key_event.code {
            KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => Some(AppEvent::Quit),
            KeyCode::Char('q') | KeyCode::Esc => Some(AppEvent::Quit),
            KeyCode::Char('?') => Some(AppEvent::ToggleHelp),
            KeyCode::Char('x') => Some(AppEvent::DismissOldest),
            KeyCode::Char('c') => Some(AppEvent::ClearPopups),
            KeyCode::Char('p') => Some(AppEvent::TogglePause),
            KeyCode::Char(ch @ '1'..='9') => {
                let slot = ch.to_digit(10).map_or(0, |d| d as usize - 1);
                Some(AppEvent::DismissSlot(slot))
            }
            _ => None,
        }
    }

    pub fn process_event(event: AppEvent, state: &mut AppState) {
        match event {
            AppEvent::Quit => state.quit(),
            AppEvent::ToggleHelp => state.toggle_help(),
            AppEvent::DismissOldest => state.dismiss_oldest(),
            AppEvent::DismissSlot(slot) => state.dismiss_slot(slot),
            AppEvent::ClearPopups => state.clear_popups(),
            AppEvent::TogglePause => state.toggle_pause(),
            AppEvent::FocusGained => state.set_focused(true),
            AppEvent::FocusLost => state.set_focused(false),
        }
    }
}
