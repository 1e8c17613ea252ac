//! Abacus - keypad calculator with a persisted history ledger
//!
//! The calculator is a button-driven state machine: digits build an operand,
//! an operator parks it, `=` evaluates. Every completed calculation is
//! appended to a history ledger that lives in a key-value store under a
//! single key, as a JSON array of `a op b = r` lines.
//!
//! The same session logic drives two front-ends:
//!
//! - a terminal UI (`tui` feature, on by default)
//! - a browser page (`wasm` feature), with a mock DOM that is always
//!   compiled so the page logic runs under native tests
//!
//! # Example
//!
//! ```rust
//! use abacus::prelude::*;
//!
//! let mut calc = Calculator::new(MemoryStore::new(), RecordingRenderer::new());
//! calc.press_labels(["5", "+", "3", "="]).unwrap();
//!
//! assert_eq!(calc.display(), "8");
//! assert_eq!(calc.history()[0].line(), "5 + 3 = 8.0000");
//! assert_eq!(calc.renderer().display, "8");
//! ```

#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::float_cmp
    )
)]
#![deny(missing_docs)]
#![deny(missing_debug_implementations)]

pub mod config;
pub mod core;
pub mod driver;
pub mod render;
pub mod session;
pub mod store;

#[cfg(feature = "tui")]
pub mod tui;

/// Browser front-end
/// (the mock DOM builds everywhere; real bindings need `wasm`)
pub mod wasm;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::{SessionConfig, DEFAULT_STORAGE_KEY};
    pub use crate::core::format::DisplayFormat;
    pub use crate::core::history::{HistoryEntry, Ledger};
    pub use crate::core::machine::{CalculatorState, Outcome, Phase};
    pub use crate::core::token::Token;
    pub use crate::core::{evaluate, CalcError, CalcResult, Operation};
    pub use crate::driver::CalculatorDriver;
    pub use crate::render::{NullRenderer, RecordingRenderer, Renderer};
    pub use crate::session::Calculator;
    pub use crate::store::{FileStore, KeyValueStore, MemoryStore, StoreError, StoreResult};

    #[cfg(feature = "tui")]
    pub use crate::driver::TuiDriver;

    pub use crate::wasm::{DomElement, DomEvent, MockDom, WasmDriver};
}
