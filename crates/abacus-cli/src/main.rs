//! Abacus: keypad calculator with a persisted history
//!
//! ## Usage
//!
//! ```bash
//! abacus                          # Interactive terminal calculator
//! abacus press 5 + 3 =            # Prints 8 and records "5 + 3 = 8.0000"
//! abacus history                  # List history, newest first
//! abacus history delete 0         # Delete the oldest entry
//! abacus config                   # Show the effective configuration
//! ```

use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    match abacus_cli::run(abacus_cli::Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
