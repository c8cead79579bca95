use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use sitefx_core::form::FormField;

use crate::app::{App, Mode};

/// Input action that can be performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    ScrollDown,
    ScrollUp,
    PageDown,
    PageUp,
    ScrollToTop,
    ScrollToBottom,
    /// Follow the nth navigation link
    JumpToSection(usize),
    EditField(FormField),
    InputChar(char),
    Backspace,
    ConfirmField,
    Cancel,
    Submit,
    ToggleHelp,
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent, app: &App) -> Action {
    match app.mode {
        Mode::Editing(_) => return handle_input_mode(key),
        // Any key exits help
        Mode::Help => return Action::ToggleHelp,
        Mode::Browse => {}
    }

    match (key.code, key.modifiers) {
        // Quit
        (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,

        // Scrolling
        (KeyCode::Char('j'), KeyModifiers::NONE) | (KeyCode::Down, _) => Action::ScrollDown,
        (KeyCode::Char('k'), KeyModifiers::NONE) | (KeyCode::Up, _) => Action::ScrollUp,
        (KeyCode::Char('d'), KeyModifiers::CONTROL) | (KeyCode::PageDown, _) => Action::PageDown,
        (KeyCode::Char('u'), KeyModifiers::CONTROL) | (KeyCode::PageUp, _) => Action::PageUp,
        (KeyCode::Char('g'), KeyModifiers::NONE) | (KeyCode::Home, _) => Action::ScrollToTop,
        (KeyCode::Char('G'), _) | (KeyCode::End, _) => Action::ScrollToBottom,

        // Navigation links 1-9
        (KeyCode::Char(c @ '1'..='9'), KeyModifiers::NONE) => {
            Action::JumpToSection(c as usize - '1' as usize)
        }

        // Contact form
        (KeyCode::Char('n'), KeyModifiers::NONE) => Action::EditField(FormField::Name),
        (KeyCode::Char('e'), KeyModifiers::NONE) => Action::EditField(FormField::Email),
        (KeyCode::Char('m'), KeyModifiers::NONE) => Action::EditField(FormField::Message),
        (KeyCode::Char('s'), KeyModifiers::NONE) => Action::Submit,

        (KeyCode::Char('?'), _) => Action::ToggleHelp,

        _ => Action::None,
    }
}

fn handle_input_mode(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Enter => Action::ConfirmField,
        KeyCode::Esc => Action::Cancel,
        KeyCode::Backspace => Action::Backspace,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Cancel,
        KeyCode::Char(c) => Action::InputChar(c),
        _ => Action::None,
    }
}
