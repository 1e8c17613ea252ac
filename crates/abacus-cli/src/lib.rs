//! Abacus CLI library
//!
//! Argument parsing, configuration, logging and the subcommand handlers
//! behind the `abacus` binary.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod config;
mod error;
pub mod handlers;
pub mod logging;
mod output;

pub use commands::{
    Cli, ColorArg, Commands, ConfigArgs, HistoryAction, HistoryArgs, LogFormatArg, PressArgs,
};
pub use config::{default_store_path, CliConfig, ColorChoice, ConfigFile, Verbosity};
pub use error::{CliError, CliResult};
pub use logging::{init_logging, LogConfig, LogFormat};
pub use output::{history_row, Reporter};

/// Runs one parsed command line
pub fn run(cli: Cli) -> CliResult<()> {
    let config = CliConfig::from_cli(&cli)?;
    config.color.apply();

    let command = cli.command.unwrap_or(Commands::Tui);
    init_logging(&config.log_config(command == Commands::Tui))?;
    tracing::debug!(?command, store = %config.store.display(), "dispatch");

    let reporter = Reporter::new(config.verbosity);
    match command {
        Commands::Tui => handlers::execute_tui(&config),
        Commands::Press(args) => handlers::execute_press(&config, &args, &reporter),
        Commands::History(args) => handlers::execute_history(&config, &args, &reporter),
        Commands::Config(args) => handlers::execute_config(&config, &args, &reporter),
    }
}
