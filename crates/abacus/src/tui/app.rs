//! Terminal application state

use ratatui::layout::Rect;

use crate::config::SessionConfig;
use crate::core::history::HistoryEntry;
use crate::core::machine::{Outcome, Phase};
use crate::core::token::Token;
use crate::render::Renderer;
use crate::session::Calculator;
use crate::store::KeyValueStore;

use super::input::KeyAction;
use super::keypad::Keypad;

/// Last frame pushed by the controller
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Screen {
    /// Display text
    pub display: String,
    /// History entries, oldest first
    pub history: Vec<HistoryEntry>,
}

impl Renderer for Screen {
    fn show_display(&mut self, text: &str) {
        self.display = text.to_string();
    }

    fn show_history(&mut self, entries: &[HistoryEntry]) {
        self.history = entries.to_vec();
    }
}

/// Calculator application state
#[derive(Debug)]
pub struct CalculatorApp<S> {
    calculator: Calculator<S, Screen>,
    keypad: Keypad,
    /// Selected row in the newest-first history list
    selected: Option<usize>,
    /// Message from the last failed calculation
    status: Option<String>,
    should_quit: bool,
}

impl<S: KeyValueStore> CalculatorApp<S> {
    /// Creates an app with the default session configuration
    pub fn new(store: S) -> Self {
        Self::with_config(store, SessionConfig::default())
    }

    /// Creates an app, loading history from `store`
    pub fn with_config(store: S, config: SessionConfig) -> Self {
        Self {
            calculator: Calculator::with_config(store, Screen::default(), config),
            keypad: Keypad::new(),
            selected: None,
            status: None,
            should_quit: false,
        }
    }

    /// Applies a key action
    pub fn handle_action(&mut self, action: KeyAction) {
        match action {
            KeyAction::Press(token) => {
                self.press(token);
            }
            KeyAction::SelectPrevious => self.select_previous(),
            KeyAction::SelectNext => self.select_next(),
            KeyAction::DeleteSelected => self.delete_selected(),
            KeyAction::ClearHistory => self.clear_history(),
            KeyAction::Quit => self.quit(),
            KeyAction::None => self.keypad.release_all(),
        }
    }

    /// Presses a calculator button and lights it up on the keypad
    pub fn press(&mut self, token: Token) -> Outcome {
        self.keypad.highlight(token);
        let outcome = self.calculator.press(token);
        match &outcome {
            Outcome::Failed(e) => self.status = Some(e.to_string()),
            Outcome::Unchanged => {}
            _ => self.status = None,
        }
        outcome
    }

    /// Handles a mouse click; `keypad_area` is where the keypad was drawn
    pub fn click(&mut self, keypad_area: Rect, x: u16, y: u16) -> Option<Outcome> {
        let token = self.keypad.hit_test(keypad_area, x, y)?;
        Some(self.press(token))
    }

    /// Moves the selection one row up (towards newer entries)
    pub fn select_previous(&mut self) {
        let len = self.history().len();
        if len == 0 {
            self.selected = None;
            return;
        }
        self.selected = Some(match self.selected {
            None | Some(0) => 0,
            Some(row) => row.min(len) - 1,
        });
    }

    /// Moves the selection one row down (towards older entries)
    pub fn select_next(&mut self) {
        let len = self.history().len();
        if len == 0 {
            self.selected = None;
            return;
        }
        self.selected = Some(match self.selected {
            None => 0,
            Some(row) => (row + 1).min(len - 1),
        });
    }

    /// Deletes the selected history entry
    pub fn delete_selected(&mut self) {
        let Some(row) = self.selected else {
            return;
        };
        let len = self.history().len();
        if row >= len {
            self.selected = None;
            return;
        }
        // Rows are newest first, storage is oldest first
        self.calculator.delete_history(len - 1 - row);

        let remaining = self.history().len();
        self.selected = if remaining == 0 {
            None
        } else {
            Some(row.min(remaining - 1))
        };
    }

    /// Deletes every history entry
    pub fn clear_history(&mut self) {
        self.calculator.clear_history();
        self.selected = None;
    }

    /// Sets the quit flag
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Returns whether the app should quit
    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Returns the display text
    #[must_use]
    pub fn display(&self) -> &str {
        &self.calculator.renderer().display
    }

    /// Returns the history, oldest first
    #[must_use]
    pub fn history(&self) -> &[HistoryEntry] {
        &self.calculator.renderer().history
    }

    /// Returns the in-progress expression
    #[must_use]
    pub fn pending_expression(&self) -> Option<String> {
        self.calculator.pending_expression()
    }

    /// Returns the calculator phase
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.calculator.phase()
    }

    /// Returns the selected row of the newest-first history list
    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Returns the last error message, if the last calculation failed
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Returns the keypad
    #[must_use]
    pub fn keypad(&self) -> &Keypad {
        &self.keypad
    }

    /// Returns the underlying calculator
    #[must_use]
    pub fn calculator(&self) -> &Calculator<S, Screen> {
        &self.calculator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Operation;
    use crate::store::MemoryStore;

    fn app() -> CalculatorApp<MemoryStore> {
        CalculatorApp::new(MemoryStore::new())
    }

    fn type_labels(app: &mut CalculatorApp<MemoryStore>, labels: &[&str]) {
        for label in labels {
            app.press(label.parse().unwrap());
        }
    }

    fn history_lines(app: &CalculatorApp<MemoryStore>) -> Vec<String> {
        app.history().iter().map(HistoryEntry::line).collect()
    }

    // ===== Constructor tests =====

    #[test]
    fn test_app_new() {
        let app = app();
        assert_eq!(app.display(), "0");
        assert!(app.history().is_empty());
        assert!(app.selected().is_none());
        assert!(app.status().is_none());
        assert!(!app.should_quit());
        assert_eq!(app.phase(), Phase::Idle);
    }

    #[test]
    fn test_app_loads_history() {
        let store = MemoryStore::with_value("calculatorHistory", r#"["2 + 2 = 4.0000"]"#);
        let app = CalculatorApp::new(store);
        assert_eq!(history_lines(&app), vec!["2 + 2 = 4.0000"]);
    }

    // ===== Button tests =====

    #[test]
    fn test_press_updates_display_and_keypad() {
        let mut app = app();
        app.press(Token::Digit(7));
        assert_eq!(app.display(), "7");
        assert_eq!(app.keypad().highlighted(), Some(Token::Digit(7)));
    }

    #[test]
    fn test_handle_action_press() {
        let mut app = app();
        for action in [
            KeyAction::Press(Token::Digit(6)),
            KeyAction::Press(Token::Operator(Operation::Multiply)),
            KeyAction::Press(Token::Digit(7)),
            KeyAction::Press(Token::Equals),
        ] {
            app.handle_action(action);
        }
        assert_eq!(app.display(), "42");
        assert_eq!(history_lines(&app), vec!["6 * 7 = 42.0000"]);
    }

    #[test]
    fn test_handle_action_none_releases_keypad() {
        let mut app = app();
        app.press(Token::Digit(1));
        app.handle_action(KeyAction::None);
        assert_eq!(app.keypad().highlighted(), None);
    }

    #[test]
    fn test_division_by_zero_sets_status() {
        let mut app = app();
        type_labels(&mut app, &["9", "/", "0", "="]);
        assert_eq!(app.display(), "Error");
        assert_eq!(app.status(), Some("Division by zero"));
        assert_eq!(app.phase(), Phase::Error);

        app.press(Token::Clear);
        assert!(app.status().is_none());
    }

    #[test]
    fn test_click_presses_button() {
        let mut app = app();
        let area = Rect::new(0, 0, 22, 12);
        let outcome = app.click(area, 10, 5);
        assert_eq!(outcome, Some(Outcome::Updated));
        assert_eq!(app.display(), "5");
    }

    #[test]
    fn test_click_on_border_is_ignored() {
        let mut app = app();
        assert!(app.click(Rect::new(0, 0, 22, 12), 0, 0).is_none());
        assert_eq!(app.display(), "0");
    }

    // ===== History selection tests =====

    fn app_with_three_entries() -> CalculatorApp<MemoryStore> {
        let mut app = app();
        type_labels(
            &mut app,
            &["1", "+", "1", "=", "2", "+", "2", "=", "3", "+", "3", "="],
        );
        app
    }

    #[test]
    fn test_select_on_empty_history() {
        let mut app = app();
        app.select_next();
        assert!(app.selected().is_none());
        app.select_previous();
        assert!(app.selected().is_none());
    }

    #[test]
    fn test_select_moves_and_clamps() {
        let mut app = app_with_three_entries();
        app.select_next();
        assert_eq!(app.selected(), Some(0));
        app.select_next();
        app.select_next();
        app.select_next();
        assert_eq!(app.selected(), Some(2));
        app.select_previous();
        assert_eq!(app.selected(), Some(1));
        app.select_previous();
        app.select_previous();
        assert_eq!(app.selected(), Some(0));
    }

    #[test]
    fn test_delete_selected_newest() {
        let mut app = app_with_three_entries();
        app.handle_action(KeyAction::SelectNext);
        app.handle_action(KeyAction::DeleteSelected);
        assert_eq!(
            history_lines(&app),
            vec!["1 + 1 = 2.0000", "2 + 2 = 4.0000"]
        );
        assert_eq!(app.selected(), Some(0));
    }

    #[test]
    fn test_delete_selected_oldest() {
        let mut app = app_with_three_entries();
        for _ in 0..3 {
            app.select_next();
        }
        app.delete_selected();
        assert_eq!(
            history_lines(&app),
            vec!["2 + 2 = 4.0000", "3 + 3 = 6.0000"]
        );
        assert_eq!(app.selected(), Some(1));
    }

    #[test]
    fn test_delete_without_selection_is_noop() {
        let mut app = app_with_three_entries();
        app.delete_selected();
        assert_eq!(app.history().len(), 3);
    }

    #[test]
    fn test_delete_last_entry_clears_selection() {
        let mut app = app();
        type_labels(&mut app, &["1", "+", "1", "="]);
        app.select_next();
        app.delete_selected();
        assert!(app.history().is_empty());
        assert!(app.selected().is_none());
    }

    #[test]
    fn test_clear_history() {
        let mut app = app_with_three_entries();
        app.select_next();
        app.handle_action(KeyAction::ClearHistory);
        assert!(app.history().is_empty());
        assert!(app.selected().is_none());
        assert_eq!(
            app.calculator().ledger().store().raw("calculatorHistory"),
            Some("[]")
        );
    }

    // ===== Quit tests =====

    #[test]
    fn test_quit() {
        let mut app = app();
        app.handle_action(KeyAction::Quit);
        assert!(app.should_quit());
    }

    #[test]
    fn test_pending_expression() {
        let mut app = app();
        type_labels(&mut app, &["4", "+"]);
        assert_eq!(app.pending_expression().as_deref(), Some("4 +"));
    }
}
