//! Command handlers - one module per subcommand
//!
//! Each handler pairs an `execute_*` entry point with pure helpers that the
//! tests call directly.

pub mod config;
pub mod history;
pub mod press;
pub mod tui;

pub use config::{execute_config, render_config};
pub use history::{check_persisted, delete_entry, execute_history, list_rows, open_ledger};
pub use press::{apply_tokens, execute_press, parse_labels, PressReport};
pub use tui::execute_tui;
