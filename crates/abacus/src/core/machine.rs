//! Input state machine
//!
//! Turns button presses into operands and operators. The machine never
//! touches storage; a finished calculation is handed back as
//! [`Outcome::Completed`] and the caller decides where it goes.
//!
//! ```text
//!            digit              op                digit
//!   Idle ───────────▶ First ─────────▶ Pending ─────────▶ Second
//!    ▲                  │                ▲  │ op (replace)    │
//!    │   AC             │ =  (no-op)     └──┘                 │ op (chain) / =
//!    └──────────────────┴─────────────────────────────────────┘
//!                     ÷0 anywhere ──▶ Error ──(digit | AC)──▶ First / Idle
//! ```

use std::fmt;

use crate::core::format::{number_to_string, parse_number, DisplayFormat, ERROR_SENTINEL};
use crate::core::history::HistoryEntry;
use crate::core::token::Token;
use crate::core::{evaluate, CalcError, Operation};

/// Phase of the calculator, derived from its state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Nothing typed yet, or a result is showing
    Idle,
    /// Typing the first operand
    FirstOperandEntry,
    /// Operator chosen, waiting for the second operand
    OperatorPending,
    /// Typing the second operand
    SecondOperandEntry,
    /// Division by zero is showing
    Error,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::FirstOperandEntry => "first-operand",
            Self::OperatorPending => "operator-pending",
            Self::SecondOperandEntry => "second-operand",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

/// What a single token did to the state
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The token was ignored
    Unchanged,
    /// The state changed without finishing a calculation
    Updated,
    /// A calculation finished and should be recorded
    Completed(HistoryEntry),
    /// A calculation failed and the machine is now showing the error sentinel
    Failed(CalcError),
}

impl Outcome {
    /// Returns the finished calculation, if any
    #[must_use]
    pub fn entry(&self) -> Option<&HistoryEntry> {
        match self {
            Self::Completed(entry) => Some(entry),
            _ => None,
        }
    }

    /// Returns true if the token changed anything
    #[must_use]
    pub fn changed(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Calculator input state
#[derive(Debug, Clone, PartialEq)]
pub struct CalculatorState {
    /// Text of the number currently shown
    display_text: String,
    /// First operand and operator of the calculation in progress
    pending: Option<(f64, Operation)>,
    /// True right after an operator or result, before the next digit
    awaiting_operand: bool,
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self::new()
    }
}

impl CalculatorState {
    /// Creates the initial state: display `0`, nothing pending
    #[must_use]
    pub fn new() -> Self {
        Self {
            display_text: "0".to_string(),
            pending: None,
            awaiting_operand: false,
        }
    }

    /// Returns the raw display text
    #[must_use]
    pub fn display_text(&self) -> &str {
        &self.display_text
    }

    /// Returns the display text as it should be rendered
    #[must_use]
    pub fn display(&self, format: &DisplayFormat) -> String {
        format.render(&self.display_text)
    }

    /// Returns the numeric value of the display, `None` when showing the error
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        parse_number(&self.display_text)
    }

    /// Returns the pending first operand
    #[must_use]
    pub fn pending_operand(&self) -> Option<f64> {
        self.pending.map(|(operand, _)| operand)
    }

    /// Returns the pending operator
    #[must_use]
    pub fn pending_operator(&self) -> Option<Operation> {
        self.pending.map(|(_, op)| op)
    }

    /// Returns true if the next digit starts a new number
    #[must_use]
    pub fn awaiting_operand(&self) -> bool {
        self.awaiting_operand
    }

    /// Returns true if the display shows the error sentinel
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.display_text == ERROR_SENTINEL
    }

    /// Returns the in-progress expression, e.g. `4 +` or `4 + 3`
    #[must_use]
    pub fn pending_expression(&self) -> Option<String> {
        let (operand, op) = self.pending?;
        let lhs = number_to_string(operand);
        if self.awaiting_operand {
            Some(format!("{lhs} {op}"))
        } else {
            Some(format!("{lhs} {op} {}", self.display_text))
        }
    }

    /// Returns the current phase
    #[must_use]
    pub fn phase(&self) -> Phase {
        if self.is_error() {
            return Phase::Error;
        }
        match (self.pending, self.awaiting_operand) {
            (Some(_), true) => Phase::OperatorPending,
            (Some(_), false) => Phase::SecondOperandEntry,
            (None, true) => Phase::Idle,
            (None, false) if self.display_text == "0" => Phase::Idle,
            (None, false) => Phase::FirstOperandEntry,
        }
    }

    /// Applies one token
    pub fn apply(&mut self, token: Token) -> Outcome {
        match token {
            Token::Digit(_) | Token::Decimal => match token.to_char() {
                Some(c) => self.input_digit(c),
                None => Outcome::Unchanged,
            },
            Token::Operator(op) => self.input_operator(op),
            Token::Equals => self.input_equals(),
            Token::Clear => self.clear_all(),
            Token::Backspace => self.backspace(),
            Token::ToggleSign => self.toggle_sign(),
            Token::Percent => self.percent(),
        }
    }

    /// Types a digit or the decimal point
    pub fn input_digit(&mut self, c: char) -> Outcome {
        if !(c.is_ascii_digit() || c == '.') {
            return Outcome::Unchanged;
        }
        let recovered = self.is_error();
        if recovered {
            self.reset();
        }
        let unchanged = if recovered {
            Outcome::Updated
        } else {
            Outcome::Unchanged
        };

        if self.awaiting_operand {
            self.display_text = if c == '.' {
                "0.".to_string()
            } else {
                c.to_string()
            };
            self.awaiting_operand = false;
            return Outcome::Updated;
        }

        let next = match (self.display_text.as_str(), c) {
            (text, '.') if text.contains('.') => return unchanged,
            ("0", d) if d != '.' => d.to_string(),
            ("-0", d) if d != '.' => format!("-{d}"),
            (text, c) => format!("{text}{c}"),
        };

        // Exponent or non-finite text cannot always take another character
        if parse_number(&next).is_none() || next == self.display_text {
            return unchanged;
        }
        self.display_text = next;
        Outcome::Updated
    }

    /// Chooses an operator, chaining a pending calculation if one is complete
    pub fn input_operator(&mut self, op: Operation) -> Outcome {
        if self.is_error() {
            return Outcome::Unchanged;
        }

        let outcome = match self.pending {
            Some((_, current)) if self.awaiting_operand => {
                if current == op {
                    return Outcome::Unchanged;
                }
                Outcome::Updated
            }
            None => {
                let Some(operand) = self.value() else {
                    return Outcome::Unchanged;
                };
                self.pending = Some((operand, op));
                Outcome::Updated
            }
            Some((operand, pending_op)) => match self.finish(operand, pending_op) {
                Ok(entry) => {
                    self.pending = Some((entry.result, op));
                    Outcome::Completed(entry)
                }
                Err(e) => return self.fail(e),
            },
        };

        if let Some((operand, _)) = self.pending {
            self.pending = Some((operand, op));
        }
        self.awaiting_operand = true;
        outcome
    }

    /// Evaluates the pending calculation
    pub fn input_equals(&mut self) -> Outcome {
        let Some((operand, op)) = self.pending else {
            return Outcome::Unchanged;
        };
        if self.awaiting_operand || self.is_error() {
            return Outcome::Unchanged;
        }

        match self.finish(operand, op) {
            Ok(entry) => {
                self.pending = None;
                self.awaiting_operand = true;
                Outcome::Completed(entry)
            }
            Err(e) => self.fail(e),
        }
    }

    /// Resets to the initial state
    pub fn clear_all(&mut self) -> Outcome {
        if *self == Self::new() {
            return Outcome::Unchanged;
        }
        self.reset();
        Outcome::Updated
    }

    /// Removes the last typed character
    pub fn backspace(&mut self) -> Outcome {
        if self.awaiting_operand || self.is_error() {
            return Outcome::Unchanged;
        }

        let mut text = self.display_text.clone();
        text.pop();
        while text.ends_with(['e', '+', '-']) {
            text.pop();
        }
        if text.is_empty() || parse_number(&text).is_none() {
            text = "0".to_string();
        }

        if text == self.display_text {
            return Outcome::Unchanged;
        }
        self.display_text = text;
        Outcome::Updated
    }

    /// Negates the displayed number. A display of exactly `0` is left alone.
    pub fn toggle_sign(&mut self) -> Outcome {
        if self.display_text == "0" {
            return Outcome::Unchanged;
        }
        let Some(value) = self.value() else {
            return Outcome::Unchanged;
        };
        self.display_text = number_to_string(-value);
        Outcome::Updated
    }

    /// Divides the displayed number by 100
    pub fn percent(&mut self) -> Outcome {
        let Some(value) = self.value() else {
            return Outcome::Unchanged;
        };
        let next = number_to_string(value / 100.0);
        if next == self.display_text {
            return Outcome::Unchanged;
        }
        self.display_text = next;
        Outcome::Updated
    }

    fn reset(&mut self) {
        *self = Self::new();
    }

    /// Evaluates `operand op display` and shows the result
    fn finish(&mut self, operand: f64, op: Operation) -> Result<HistoryEntry, CalcError> {
        let Some(rhs) = self.value() else {
            return Err(CalcError::DivisionByZero);
        };
        let result = evaluate(operand, rhs, op)?;
        self.display_text = number_to_string(result);
        Ok(HistoryEntry::new(operand, op, rhs, result))
    }

    fn fail(&mut self, error: CalcError) -> Outcome {
        tracing::warn!(error = %error, "calculation failed");
        self.display_text = ERROR_SENTINEL.to_string();
        self.pending = None;
        self.awaiting_operand = true;
        Outcome::Failed(error)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn run(labels: &[&str]) -> (CalculatorState, Vec<Outcome>) {
        let mut state = CalculatorState::new();
        let outcomes = labels
            .iter()
            .map(|label| state.apply(label.parse().unwrap()))
            .collect();
        (state, outcomes)
    }

    /// State with `text` typed as the first operand
    fn typed(text: &str) -> CalculatorState {
        let mut state = CalculatorState::new();
        state.display_text = text.to_string();
        state
    }

    fn completed(outcomes: &[Outcome]) -> Vec<String> {
        outcomes
            .iter()
            .filter_map(Outcome::entry)
            .map(HistoryEntry::line)
            .collect()
    }

    // ===== Initial state =====

    #[test]
    fn test_initial_state() {
        let state = CalculatorState::new();
        assert_eq!(state.display_text(), "0");
        assert_eq!(state.pending_operand(), None);
        assert_eq!(state.pending_operator(), None);
        assert!(!state.awaiting_operand());
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.pending_expression(), None);
    }

    // ===== Digit entry =====

    #[test]
    fn test_digits_concatenate() {
        let (state, _) = run(&["1", "2", "3"]);
        assert_eq!(state.display_text(), "123");
        assert_eq!(state.phase(), Phase::FirstOperandEntry);
    }

    #[test]
    fn test_leading_zero_replaced() {
        let (state, outcomes) = run(&["0", "0", "7"]);
        assert_eq!(state.display_text(), "7");
        assert_eq!(outcomes[0], Outcome::Unchanged);
    }

    #[test]
    fn test_decimal_after_zero() {
        let (state, _) = run(&["0", ".", "5"]);
        assert_eq!(state.display_text(), "0.5");
    }

    #[test]
    fn test_second_decimal_rejected() {
        let (state, outcomes) = run(&["1", ".", "2", ".", "3"]);
        assert_eq!(state.display_text(), "1.23");
        assert_eq!(outcomes[3], Outcome::Unchanged);
    }

    #[test]
    fn test_decimal_when_awaiting_starts_zero_point() {
        let (state, _) = run(&["4", "+", "."]);
        assert_eq!(state.display_text(), "0.");
        assert_eq!(state.phase(), Phase::SecondOperandEntry);
    }

    #[test]
    fn test_digit_into_exponent_text() {
        let mut state = typed("5e-8");
        assert_eq!(state.input_digit('.'), Outcome::Unchanged);
        assert_eq!(state.input_digit('1'), Outcome::Updated);
        assert_eq!(state.display_text(), "5e-81");
    }

    #[test]
    fn test_input_digit_rejects_other_chars() {
        let mut state = CalculatorState::new();
        assert_eq!(state.input_digit('x'), Outcome::Unchanged);
        assert_eq!(state.display_text(), "0");
    }

    // ===== Operators =====

    #[test]
    fn test_operator_captures_operand() {
        let (state, _) = run(&["4", "+"]);
        assert_eq!(state.pending_operand(), Some(4.0));
        assert_eq!(state.pending_operator(), Some(Operation::Add));
        assert!(state.awaiting_operand());
        assert_eq!(state.display_text(), "4");
        assert_eq!(state.phase(), Phase::OperatorPending);
        assert_eq!(state.pending_expression().as_deref(), Some("4 +"));
    }

    #[test]
    fn test_operator_twice_replaces() {
        let (state, outcomes) = run(&["4", "+", "*"]);
        assert_eq!(state.pending_operand(), Some(4.0));
        assert_eq!(state.pending_operator(), Some(Operation::Multiply));
        assert!(completed(&outcomes).is_empty());
    }

    #[test]
    fn test_same_operator_twice_unchanged() {
        let (_, outcomes) = run(&["4", "+", "+"]);
        assert_eq!(outcomes[2], Outcome::Unchanged);
    }

    #[test]
    fn test_operator_chaining_records_entry() {
        let (state, outcomes) = run(&["2", "+", "3", "*"]);
        assert_eq!(state.display_text(), "5");
        assert_eq!(state.pending_operand(), Some(5.0));
        assert_eq!(state.pending_operator(), Some(Operation::Multiply));
        assert_eq!(completed(&outcomes), vec!["2 + 3 = 5.0000"]);
    }

    #[test]
    fn test_chain_then_equals() {
        let (state, outcomes) = run(&["2", "+", "3", "*", "4", "="]);
        assert_eq!(state.display_text(), "20");
        assert_eq!(
            completed(&outcomes),
            vec!["2 + 3 = 5.0000", "5 * 4 = 20.0000"]
        );
    }

    #[test]
    fn test_pending_expression_while_typing_second() {
        let (state, _) = run(&["4", "+", "3", "2"]);
        assert_eq!(state.pending_expression().as_deref(), Some("4 + 32"));
    }

    // ===== Equals =====

    #[test]
    fn test_scenario_five_plus_three() {
        let (state, outcomes) = run(&["5", "+", "3", "="]);
        assert_eq!(state.display_text(), "8");
        assert_eq!(completed(&outcomes), vec!["5 + 3 = 8.0000"]);
        assert_eq!(state.pending_operator(), None);
        assert!(state.awaiting_operand());
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn test_scenario_divide_by_zero() {
        let (state, outcomes) = run(&["9", "/", "0", "="]);
        assert_eq!(state.display_text(), "Error");
        assert!(completed(&outcomes).is_empty());
        assert_eq!(outcomes[3], Outcome::Failed(CalcError::DivisionByZero));
        assert_eq!(state.pending_operand(), None);
        assert_eq!(state.pending_operator(), None);
        assert_eq!(state.phase(), Phase::Error);
    }

    #[test]
    fn test_divide_by_zero_while_chaining() {
        let (state, outcomes) = run(&["9", "/", "0", "+"]);
        assert!(state.is_error());
        assert!(completed(&outcomes).is_empty());
    }

    #[test]
    fn test_scenario_equals_without_second_operand() {
        let (state, outcomes) = run(&["4", "+", "="]);
        assert_eq!(outcomes[2], Outcome::Unchanged);
        assert_eq!(state.display_text(), "4");
        assert_eq!(state.pending_expression().as_deref(), Some("4 +"));
        assert!(completed(&outcomes).is_empty());
    }

    #[test]
    fn test_equals_without_operator_is_noop() {
        let (state, outcomes) = run(&["7", "="]);
        assert_eq!(outcomes[1], Outcome::Unchanged);
        assert_eq!(state.display_text(), "7");
    }

    #[test]
    fn test_repeated_equals_is_noop() {
        let (state, outcomes) = run(&["5", "+", "3", "=", "="]);
        assert_eq!(outcomes[4], Outcome::Unchanged);
        assert_eq!(state.display_text(), "8");
    }

    #[test]
    fn test_digit_after_result_starts_fresh() {
        let (state, _) = run(&["5", "+", "3", "=", "2"]);
        assert_eq!(state.display_text(), "2");
        assert_eq!(state.phase(), Phase::FirstOperandEntry);
    }

    #[test]
    fn test_operator_after_result_uses_result() {
        let (state, outcomes) = run(&["5", "+", "3", "=", "-", "1", "="]);
        assert_eq!(state.display_text(), "7");
        assert_eq!(completed(&outcomes).last().unwrap(), "8 - 1 = 7.0000");
    }

    #[test]
    fn test_float_result_display() {
        let (state, outcomes) = run(&["0", ".", "1", "+", "0", ".", "2", "="]);
        assert_eq!(state.display_text(), "0.30000000000000004");
        assert_eq!(state.display(&DisplayFormat::default()), "0.3000000000");
        assert_eq!(completed(&outcomes), vec!["0.1 + 0.2 = 0.3000"]);
    }

    // ===== Error recovery =====

    #[test]
    fn test_digit_after_error_starts_fresh() {
        let (state, _) = run(&["9", "/", "0", "=", "3"]);
        assert_eq!(state.display_text(), "3");
        assert_eq!(state.pending_operator(), None);
        assert_eq!(state.phase(), Phase::FirstOperandEntry);
    }

    #[test]
    fn test_decimal_after_error_starts_fresh() {
        let (state, _) = run(&["9", "/", "0", "=", "."]);
        assert_eq!(state.display_text(), "0.");
    }

    #[test]
    fn test_zero_after_error_clears_sentinel() {
        let (state, outcomes) = run(&["9", "/", "0", "=", "0"]);
        assert_eq!(outcomes[4], Outcome::Updated);
        assert_eq!(state, CalculatorState::new());
    }

    #[test]
    fn test_error_ignores_non_digit_tokens() {
        for label in ["+", "=", "DEL", "+/-", "%"] {
            let (state, outcomes) = run(&["9", "/", "0", "=", label]);
            assert_eq!(outcomes[4], Outcome::Unchanged, "{label}");
            assert!(state.is_error());
        }
    }

    // ===== Clear =====

    #[test]
    fn test_clear_resets() {
        let (state, _) = run(&["5", "+", "3", "AC"]);
        assert_eq!(state, CalculatorState::new());
    }

    #[test]
    fn test_clear_idempotent() {
        let (state, outcomes) = run(&["5", "*", "AC", "AC"]);
        assert_eq!(state, CalculatorState::new());
        assert_eq!(outcomes[3], Outcome::Unchanged);
    }

    // ===== Backspace =====

    #[test]
    fn test_backspace_removes_last() {
        let (state, _) = run(&["1", "2", "3", "DEL"]);
        assert_eq!(state.display_text(), "12");
    }

    #[test]
    fn test_backspace_to_zero() {
        let (state, _) = run(&["7", "DEL", "DEL"]);
        assert_eq!(state.display_text(), "0");
    }

    #[test]
    fn test_backspace_strips_dangling_sign() {
        let (state, _) = run(&["5", "+/-", "DEL"]);
        assert_eq!(state.display_text(), "0");
    }

    #[test]
    fn test_backspace_noop_when_awaiting() {
        let (state, outcomes) = run(&["5", "+", "3", "=", "DEL"]);
        assert_eq!(outcomes[4], Outcome::Unchanged);
        assert_eq!(state.display_text(), "8");
    }

    #[test]
    fn test_backspace_through_exponent() {
        let mut state = typed("5e-8");
        state.backspace();
        assert_eq!(state.display_text(), "5");

        let mut state = typed("Infinity");
        state.backspace();
        assert_eq!(state.display_text(), "0");
    }

    // ===== Sign and percent =====

    #[test]
    fn test_toggle_sign() {
        let (state, _) = run(&["5", "+/-"]);
        assert_eq!(state.display_text(), "-5");
        let (state, _) = run(&["5", "+/-", "+/-"]);
        assert_eq!(state.display_text(), "5");
    }

    #[test]
    fn test_toggle_sign_zero_is_noop() {
        let (state, outcomes) = run(&["+/-"]);
        assert_eq!(outcomes[0], Outcome::Unchanged);
        assert_eq!(state.display_text(), "0");
    }

    #[test]
    fn test_percent() {
        let (state, _) = run(&["5", "0", "%"]);
        assert_eq!(state.display_text(), "0.5");
    }

    #[test]
    fn test_percent_keeps_awaiting_flag() {
        let (state, _) = run(&["5", "+", "3", "=", "%"]);
        assert_eq!(state.display_text(), "0.08");
        assert!(state.awaiting_operand());
    }

    #[test]
    fn test_percent_of_zero_unchanged() {
        let (_, outcomes) = run(&["%"]);
        assert_eq!(outcomes[0], Outcome::Unchanged);
    }

    // ===== Display =====

    #[test]
    fn test_display_truncates_long_text() {
        let (state, _) = run(&["1", "2", "3", "4", "5", "6", "7", "8", "9", "0", "1", "2", "3", "4", "5", "6"]);
        assert_eq!(state.display_text(), "1234567890123456");
        assert_eq!(state.display(&DisplayFormat::default()), "1.234567890e+15");
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::OperatorPending.to_string(), "operator-pending");
    }

    #[test]
    fn test_outcome_changed() {
        assert!(!Outcome::Unchanged.changed());
        assert!(Outcome::Updated.changed());
        assert!(Outcome::Failed(CalcError::DivisionByZero).changed());
    }
}
