//! Interactive terminal handler

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};

/// Execute the tui command
#[cfg(feature = "tui")]
pub fn execute_tui(config: &CliConfig) -> CliResult<()> {
    use abacus::store::FileStore;
    use abacus::tui::{run, CalculatorApp};

    let store = FileStore::new(&config.store);
    let mut app = CalculatorApp::with_config(store, config.session.clone());
    tracing::info!(store = %config.store.display(), "starting terminal calculator");
    run(&mut app).map_err(|e| CliError::terminal(e.to_string()))
}

/// Execute the tui command
#[cfg(not(feature = "tui"))]
pub fn execute_tui(_config: &CliConfig) -> CliResult<()> {
    Err(CliError::config(
        "terminal UI not enabled. Rebuild with --features tui",
    ))
}
