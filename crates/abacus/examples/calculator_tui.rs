//! Calculator TUI Example
//!
//! Runs the terminal calculator with history kept in memory, so nothing is
//! written to disk. The `abacus` binary is the persistent version.
//!
//! Run with: cargo run --example calculator_tui --features tui

use abacus::store::MemoryStore;
use abacus::tui::{run, CalculatorApp};

fn main() -> std::io::Result<()> {
    let mut app = CalculatorApp::new(MemoryStore::new());
    run(&mut app)?;

    for entry in app.history() {
        println!("{entry}");
    }
    Ok(())
}
