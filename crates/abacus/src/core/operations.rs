//! The four binary operators and the evaluator that applies them
//!
//! Only ever applies one fixed operator to two already-parsed numbers.
//! Free-form text is never evaluated.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::{CalcError, CalcResult};

/// Type-safe operation enum - compile-time guarantee of valid operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    /// Addition (+)
    Add,
    /// Subtraction (-)
    Subtract,
    /// Multiplication (*)
    Multiply,
    /// Division (/)
    Divide,
}

impl Operation {
    /// All operators in keypad order
    pub const ALL: [Self; 4] = [Self::Add, Self::Subtract, Self::Multiply, Self::Divide];

    /// Returns the operator symbol for display
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
        }
    }

    /// Maps a keypad symbol back to an operation
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(Self::Add),
            "-" => Some(Self::Subtract),
            "*" => Some(Self::Multiply),
            "/" => Some(Self::Divide),
            _ => None,
        }
    }

    /// Applies this operation to two operands
    pub fn apply(self, a: f64, b: f64) -> CalcResult<f64> {
        evaluate(a, b, self)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Operation {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_symbol(s).ok_or_else(|| CalcError::UnknownToken(s.to_string()))
    }
}

/// Applies `op` to `a` and `b`.
///
/// A zero divisor (either sign) yields [`CalcError::DivisionByZero`]; every
/// other combination produces a value, including non-finite ones.
pub fn evaluate(a: f64, b: f64, op: Operation) -> CalcResult<f64> {
    match op {
        Operation::Add => Ok(a + b),
        Operation::Subtract => Ok(a - b),
        Operation::Multiply => Ok(a * b),
        Operation::Divide => {
            if b == 0.0 {
                return Err(CalcError::DivisionByZero);
            }
            Ok(a / b)
        }
    }
}
