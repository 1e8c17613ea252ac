//! Core calculator module: evaluator, input state machine and history ledger
//!
//! Nothing in here touches a terminal, a DOM or a file. Front-ends talk to the
//! core through [`crate::render::Renderer`] and [`crate::store::KeyValueStore`].

pub mod format;
pub mod history;
pub mod machine;
mod operations;
pub mod token;

pub use operations::{evaluate, Operation};

use thiserror::Error;

/// Result type for calculator operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Calculator error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    /// Division by zero attempted
    #[error("Division by zero")]
    DivisionByZero,
    /// A button label that is not part of the keypad
    #[error("Unknown button: {0}")]
    UnknownToken(String),
    /// Persisted history that is not a JSON array of `a op b = r` lines
    #[error("Malformed history: {0}")]
    MalformedHistory(String),
}
