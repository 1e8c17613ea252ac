//! Unified calculator driver
//!
//! Scenario logic is written once against [`CalculatorDriver`] and run
//! against every front-end: the terminal app and the mock browser page.

#![allow(clippy::unwrap_used)]

use crate::core::CalcResult;

/// Interactions every calculator front-end supports
///
/// # Example
///
/// ```rust,ignore
/// fn verify_addition<D: CalculatorDriver>(driver: &mut D) {
///     driver.press_sequence(&["5", "+", "3", "="]).unwrap();
///     assert_eq!(driver.display(), "8");
/// }
///
/// verify_addition(&mut TuiDriver::new());
/// verify_addition(&mut WasmDriver::new());
/// ```
pub trait CalculatorDriver {
    /// Presses the button with this label
    fn press(&mut self, label: &str) -> CalcResult<()>;

    /// Returns the display text as shown to the user
    fn display(&self) -> String;

    /// Returns the history lines as shown, newest first
    fn history(&self) -> Vec<String>;

    /// Deletes the entry shown at `row` of the newest-first list
    fn delete_history_row(&mut self, row: usize);

    /// Deletes every history entry
    fn clear_history(&mut self);

    /// Presses several buttons in order
    fn press_sequence(&mut self, labels: &[&str]) -> CalcResult<()> {
        labels.iter().try_for_each(|label| self.press(label))
    }
}

/// Terminal driver
#[cfg(feature = "tui")]
pub mod tui_driver {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use super::CalculatorDriver;
    use crate::core::token::Token;
    use crate::core::CalcResult;
    use crate::store::MemoryStore;
    use crate::tui::{CalculatorApp, InputHandler, KeyAction};

    /// Drives the terminal app through its key bindings
    #[derive(Debug)]
    pub struct TuiDriver {
        app: CalculatorApp<MemoryStore>,
        input: InputHandler,
    }

    impl Default for TuiDriver {
        fn default() -> Self {
            Self::new()
        }
    }

    impl TuiDriver {
        /// Creates a driver over a fresh app with in-memory storage
        #[must_use]
        pub fn new() -> Self {
            Self::with_app(CalculatorApp::new(MemoryStore::new()))
        }

        /// Creates a driver over an existing app
        #[must_use]
        pub fn with_app(app: CalculatorApp<MemoryStore>) -> Self {
            Self {
                app,
                input: InputHandler::new(),
            }
        }

        /// Returns the underlying app
        #[must_use]
        pub fn app(&self) -> &CalculatorApp<MemoryStore> {
            &self.app
        }

        /// Sends one key press through the key bindings
        pub fn send_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
            let action = self.input.handle_key(KeyEvent::new(code, modifiers));
            self.app.handle_action(action);
        }

        fn key_for(token: Token) -> KeyCode {
            match token {
                Token::Equals => KeyCode::Enter,
                Token::Clear => KeyCode::Esc,
                Token::Backspace => KeyCode::Backspace,
                Token::ToggleSign => KeyCode::Char('n'),
                Token::Percent => KeyCode::Char('%'),
                Token::Digit(_) | Token::Decimal => {
                    KeyCode::Char(token.to_char().unwrap_or('.'))
                }
                Token::Operator(op) => KeyCode::Char(op.symbol().chars().next().unwrap_or('+')),
            }
        }
    }

    impl CalculatorDriver for TuiDriver {
        fn press(&mut self, label: &str) -> CalcResult<()> {
            let token: Token = label.parse()?;
            self.send_key(Self::key_for(token), KeyModifiers::NONE);
            Ok(())
        }

        fn display(&self) -> String {
            self.app.display().to_string()
        }

        fn history(&self) -> Vec<String> {
            self.app.history().iter().rev().map(|e| e.line()).collect()
        }

        fn delete_history_row(&mut self, row: usize) {
            // Walk the selection down from the newest entry
            while self.app.selected().map_or(true, |selected| selected < row) {
                let before = self.app.selected();
                self.app.handle_action(KeyAction::SelectNext);
                if self.app.selected() == before {
                    break;
                }
            }
            while self.app.selected().is_some_and(|selected| selected > row) {
                self.app.handle_action(KeyAction::SelectPrevious);
            }
            if self.app.selected() == Some(row) {
                self.send_key(KeyCode::Delete, KeyModifiers::NONE);
            }
        }

        fn clear_history(&mut self) {
            self.send_key(KeyCode::Char('l'), KeyModifiers::CONTROL);
        }
    }
}

#[cfg(feature = "tui")]
pub use tui_driver::TuiDriver;

// ===== Unified scenarios =====
// These run against ANY CalculatorDriver implementation

/// Four operators, each finished with `=`
pub fn verify_basic_arithmetic<D: CalculatorDriver>(driver: &mut D) {
    for (labels, expected) in [
        (["2", "+", "3", "="], "5"),
        (["9", "-", "4", "="], "5"),
        (["6", "*", "7", "="], "42"),
        (["8", "/", "5", "="], "1.6"),
    ] {
        driver.press("AC").unwrap();
        driver.press_sequence(&labels).unwrap();
        assert_eq!(driver.display(), expected, "{labels:?}");
    }
}

/// `5 + 3 =` shows 8 and records one entry
pub fn verify_addition_scenario<D: CalculatorDriver>(driver: &mut D) {
    driver.clear_history();
    driver.press_sequence(&["AC", "5", "+", "3", "="]).unwrap();
    assert_eq!(driver.display(), "8");
    assert_eq!(driver.history(), vec!["5 + 3 = 8.0000"]);
}

/// `9 / 0 =` shows the error sentinel and records nothing
pub fn verify_division_by_zero<D: CalculatorDriver>(driver: &mut D) {
    driver.clear_history();
    driver.press_sequence(&["AC", "9", "/", "0", "="]).unwrap();
    assert_eq!(driver.display(), "Error");
    assert!(driver.history().is_empty());

    // A digit starts over
    driver.press("7").unwrap();
    assert_eq!(driver.display(), "7");
}

/// `4 + =` leaves the display alone and records nothing
pub fn verify_equals_without_operand<D: CalculatorDriver>(driver: &mut D) {
    driver.clear_history();
    driver.press_sequence(&["AC", "4", "+", "="]).unwrap();
    assert_eq!(driver.display(), "4");
    assert!(driver.history().is_empty());
}

/// Operator chaining records each intermediate calculation
pub fn verify_chaining<D: CalculatorDriver>(driver: &mut D) {
    driver.clear_history();
    driver
        .press_sequence(&["AC", "2", "+", "3", "*", "4", "="])
        .unwrap();
    assert_eq!(driver.display(), "20");
    assert_eq!(
        driver.history(),
        vec!["5 * 4 = 20.0000", "2 + 3 = 5.0000"]
    );
}

/// Editing buttons: DEL, +/-, %, and AC
pub fn verify_editing<D: CalculatorDriver>(driver: &mut D) {
    driver.press_sequence(&["AC", "1", "2", "3", "DEL"]).unwrap();
    assert_eq!(driver.display(), "12");
    driver.press("+/-").unwrap();
    assert_eq!(driver.display(), "-12");
    driver.press("%").unwrap();
    assert_eq!(driver.display(), "-0.12");
    driver.press("AC").unwrap();
    assert_eq!(driver.display(), "0");
}

/// History is newest first and can be pruned entry by entry or all at once
pub fn verify_history<D: CalculatorDriver>(driver: &mut D) {
    driver.clear_history();
    driver
        .press_sequence(&["AC", "1", "+", "1", "=", "2", "+", "2", "=", "3", "+", "3", "="])
        .unwrap();
    assert_eq!(
        driver.history(),
        vec!["3 + 3 = 6.0000", "2 + 2 = 4.0000", "1 + 1 = 2.0000"]
    );

    driver.delete_history_row(1);
    assert_eq!(driver.history(), vec!["3 + 3 = 6.0000", "1 + 1 = 2.0000"]);

    driver.delete_history_row(5);
    assert_eq!(driver.history().len(), 2);

    driver.clear_history();
    assert!(driver.history().is_empty());
}

/// Unknown labels are rejected without touching the display
pub fn verify_unknown_label<D: CalculatorDriver>(driver: &mut D) {
    driver.press_sequence(&["AC", "5"]).unwrap();
    assert!(driver.press("sqrt").is_err());
    assert_eq!(driver.display(), "5");
}

/// Every scenario in order
pub fn run_all_scenarios<D: CalculatorDriver>(driver: &mut D) {
    verify_basic_arithmetic(driver);
    verify_addition_scenario(driver);
    verify_division_by_zero(driver);
    verify_equals_without_operand(driver);
    verify_chaining(driver);
    verify_editing(driver);
    verify_history(driver);
    verify_unknown_label(driver);
}
