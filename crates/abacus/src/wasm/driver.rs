//! Browser driver over the mock DOM
//!
//! Implements [`CalculatorDriver`] by clicking elements of a [`MockDom`],
//! so the browser page logic runs under the same scenarios as the terminal.

use super::dom::{button_id, DomAction, DomEvent, MockDom};
use crate::core::machine::Outcome;
use crate::core::token::Token;
use crate::core::CalcResult;
use crate::driver::CalculatorDriver;
use crate::session::Calculator;
use crate::store::{KeyValueStore, MemoryStore};

/// Calculator session rendering into a mock DOM
#[derive(Debug)]
pub struct WasmDriver<S = MemoryStore> {
    calculator: Calculator<S, MockDom>,
}

impl Default for WasmDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl WasmDriver {
    /// Creates a driver with in-memory storage
    #[must_use]
    pub fn new() -> Self {
        Self::with_store(MemoryStore::new())
    }
}

impl<S: KeyValueStore> WasmDriver<S> {
    /// Creates a driver over `store`, as if the page had just loaded
    pub fn with_store(store: S) -> Self {
        Self {
            calculator: Calculator::new(store, MockDom::calculator()),
        }
    }

    /// Returns the mock DOM
    #[must_use]
    pub fn dom(&self) -> &MockDom {
        self.calculator.renderer()
    }

    /// Returns the calculator session
    #[must_use]
    pub fn calculator(&self) -> &Calculator<S, MockDom> {
        &self.calculator
    }

    /// Clicks the element with this id
    pub fn click(&mut self, element_id: &str) -> Option<Outcome> {
        let action = self
            .calculator
            .renderer_mut()
            .dispatch_event(DomEvent::click(element_id));
        self.perform(action)
    }

    /// Presses a keyboard key on the page
    pub fn key_press(&mut self, key: &str) -> Option<Outcome> {
        let action = self
            .calculator
            .renderer_mut()
            .dispatch_event(DomEvent::key_press(key));
        self.perform(action)
    }

    fn perform(&mut self, action: Option<DomAction>) -> Option<Outcome> {
        match action? {
            DomAction::Press(token) => Some(self.calculator.press(token)),
            DomAction::DeleteHistory(index) => {
                self.calculator.delete_history(index);
                None
            }
            DomAction::ClearHistory => {
                self.calculator.clear_history();
                None
            }
        }
    }
}

impl<S: KeyValueStore> CalculatorDriver for WasmDriver<S> {
    fn press(&mut self, label: &str) -> CalcResult<()> {
        let token: Token = label.parse()?;
        self.click(&button_id(token));
        Ok(())
    }

    fn display(&self) -> String {
        self.dom().display_value().to_string()
    }

    fn history(&self) -> Vec<String> {
        self.dom().history_items()
    }

    fn delete_history_row(&mut self, row: usize) {
        if let Some(id) = self.dom().delete_button_id(row) {
            self.click(&id);
        }
    }

    fn clear_history(&mut self) {
        self.click(super::dom::CLEAR_HISTORY_ID);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{
        run_all_scenarios, verify_addition_scenario, verify_basic_arithmetic,
        verify_chaining, verify_division_by_zero, verify_editing, verify_equals_without_operand,
        verify_history, verify_unknown_label,
    };

    // ===== Constructor tests =====

    #[test]
    fn test_wasm_driver_new() {
        let driver = WasmDriver::default();
        assert_eq!(driver.display(), "0");
        assert!(driver.history().is_empty());
    }

    #[test]
    fn test_wasm_driver_loads_stored_history() {
        let store = MemoryStore::with_value("calculatorHistory", r#"["1 + 2 = 3.0000"]"#);
        let driver = WasmDriver::with_store(store);
        assert_eq!(driver.history(), vec!["1 + 2 = 3.0000"]);
    }

    #[test]
    fn test_wasm_driver_corrupt_storage_is_empty() {
        let store = MemoryStore::with_value("calculatorHistory", "{{{");
        let driver = WasmDriver::with_store(store);
        assert!(driver.history().is_empty());
    }

    // ===== Interaction tests =====

    #[test]
    fn test_keyboard_input() {
        let mut driver = WasmDriver::new();
        for key in ["7", "*", "6", "Enter"] {
            driver.key_press(key);
        }
        assert_eq!(driver.display(), "42");
        assert_eq!(driver.history(), vec!["7 * 6 = 42.0000"]);
    }

    #[test]
    fn test_ignored_key() {
        let mut driver = WasmDriver::new();
        assert!(driver.key_press("Shift").is_none());
        assert_eq!(driver.display(), "0");
    }

    #[test]
    fn test_click_records_events() {
        let mut driver = WasmDriver::new();
        driver.press_sequence(&["1", "+"]).unwrap();
        assert_eq!(
            driver.dom().event_history(),
            &[DomEvent::click("btn-1"), DomEvent::click("btn-add")]
        );
    }

    #[test]
    fn test_delete_persists() {
        let mut driver = WasmDriver::new();
        driver
            .press_sequence(&["1", "+", "1", "=", "2", "+", "2", "="])
            .unwrap();
        driver.delete_history_row(0);
        assert_eq!(
            driver.calculator().ledger().store().raw("calculatorHistory"),
            Some(r#"["1 + 1 = 2.0000"]"#)
        );
    }

    #[test]
    fn test_long_result_is_truncated() {
        let mut driver = WasmDriver::new();
        driver.press_sequence(&["2", "/", "3", "="]).unwrap();
        assert_eq!(driver.display(), "0.6666666667");
        assert_eq!(driver.history(), vec!["2 / 3 = 0.6667"]);
    }

    // ===== Unified scenarios =====

    #[test]
    fn test_unified_basic_arithmetic() {
        verify_basic_arithmetic(&mut WasmDriver::new());
    }

    #[test]
    fn test_unified_addition_scenario() {
        verify_addition_scenario(&mut WasmDriver::new());
    }

    #[test]
    fn test_unified_division_by_zero() {
        verify_division_by_zero(&mut WasmDriver::new());
    }

    #[test]
    fn test_unified_equals_without_operand() {
        verify_equals_without_operand(&mut WasmDriver::new());
    }

    #[test]
    fn test_unified_chaining() {
        verify_chaining(&mut WasmDriver::new());
    }

    #[test]
    fn test_unified_editing() {
        verify_editing(&mut WasmDriver::new());
    }

    #[test]
    fn test_unified_history() {
        verify_history(&mut WasmDriver::new());
    }

    #[test]
    fn test_unified_unknown_label() {
        verify_unknown_label(&mut WasmDriver::new());
    }

    #[test]
    fn test_all_scenarios() {
        run_all_scenarios(&mut WasmDriver::new());
    }
}
