//! Keyboard input mapping

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::token::Token;

/// Actions that can be triggered by keyboard input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Press a calculator button
    Press(Token),
    /// Move the history selection towards newer entries
    SelectPrevious,
    /// Move the history selection towards older entries
    SelectNext,
    /// Delete the selected history entry
    DeleteSelected,
    /// Delete every history entry
    ClearHistory,
    /// Quit the application
    Quit,
    /// No action (ignored input)
    None,
}

/// Input handler that maps key events to actions
#[derive(Debug, Default)]
pub struct InputHandler;

impl InputHandler {
    /// Creates a new input handler
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Maps a key event to an action
    #[must_use]
    pub fn handle_key(&self, event: KeyEvent) -> KeyAction {
        let KeyEvent {
            code, modifiers, ..
        } = event;

        if modifiers.contains(KeyModifiers::CONTROL) {
            return match code {
                KeyCode::Char('c') => KeyAction::Quit,
                KeyCode::Char('l') => KeyAction::ClearHistory,
                _ => KeyAction::None,
            };
        }

        match code {
            KeyCode::Char('q') => KeyAction::Quit,
            KeyCode::Char('n') => KeyAction::Press(Token::ToggleSign),
            KeyCode::Char(c) => Token::from_char(c).map_or(KeyAction::None, KeyAction::Press),
            KeyCode::Enter => KeyAction::Press(Token::Equals),
            KeyCode::Esc => KeyAction::Press(Token::Clear),
            KeyCode::Backspace => KeyAction::Press(Token::Backspace),
            KeyCode::Up => KeyAction::SelectPrevious,
            KeyCode::Down => KeyAction::SelectNext,
            KeyCode::Delete => KeyAction::DeleteSelected,
            _ => KeyAction::None,
        }
    }
}
