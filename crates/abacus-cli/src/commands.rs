//! CLI command definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Abacus: keypad calculator with a persisted history
#[derive(Parser, Debug)]
#[command(name = "abacus")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// History file (defaults to the platform data directory)
    #[arg(long, env = "ABACUS_STORE", global = true)]
    pub store: Option<PathBuf>,

    /// YAML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Log output format
    #[arg(long, default_value = "compact", global = true)]
    pub log_format: LogFormatArg,

    /// Subcommand to run (defaults to `tui`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// CLI subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run the interactive terminal calculator
    Tui,

    /// Press keypad buttons and print the display
    ///
    /// Labels are the keypad captions: digits, `.`, `+`, `-`, `*`, `/`,
    /// `=`, `AC`, `DEL`, `+/-` and `%`. Completed calculations are
    /// appended to the history.
    Press(PressArgs),

    /// Inspect or edit the calculation history
    History(HistoryArgs),

    /// Show the effective configuration
    Config(ConfigArgs),
}

/// Arguments for the press command
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
pub struct PressArgs {
    /// Button labels, pressed in order
    #[arg(required = true, allow_hyphen_values = true)]
    pub labels: Vec<String>,

    /// Print the pending expression alongside the display
    #[arg(long)]
    pub expression: bool,
}

/// Arguments for the history command
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
pub struct HistoryArgs {
    /// History action (defaults to `list`)
    #[command(subcommand)]
    pub action: Option<HistoryAction>,
}

/// History subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum HistoryAction {
    /// List entries, newest first
    List {
        /// Print the stored JSON payload instead
        #[arg(long)]
        json: bool,
    },

    /// Delete one entry by its index (0 = oldest)
    Delete {
        /// Entry index as shown by `history list`
        index: usize,
    },

    /// Delete every entry
    Clear,
}

/// Arguments for the config command
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
pub struct ConfigArgs {
    /// Show built-in defaults instead of the effective configuration
    #[arg(long)]
    pub defaults: bool,
}

/// Color argument for CLI
#[derive(ValueEnum, Clone, Debug, Default, PartialEq, Eq)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

/// Log format argument for CLI
#[derive(ValueEnum, Clone, Debug, Default, PartialEq, Eq)]
pub enum LogFormatArg {
    /// Multi-line human-readable output
    Pretty,
    /// Single-line output
    #[default]
    Compact,
    /// One JSON object per event
    Json,
}

impl From<LogFormatArg> for crate::logging::LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Compact => Self::Compact,
            LogFormatArg::Json => Self::Json,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("abacus").chain(args.iter().copied())).unwrap()
    }

    mod cli_tests {
        use super::*;

        #[test]
        fn test_no_subcommand() {
            let cli = parse(&[]);
            assert!(cli.command.is_none());
            assert_eq!(cli.verbose, 0);
            assert!(!cli.quiet);
        }

        #[test]
        fn test_verbose_count() {
            let cli = parse(&["-vv", "tui"]);
            assert_eq!(cli.verbose, 2);
            assert_eq!(cli.command, Some(Commands::Tui));
        }

        #[test]
        fn test_global_flags_after_subcommand() {
            let cli = parse(&["config", "--store", "/tmp/h.json", "-q"]);
            assert_eq!(cli.store, Some(PathBuf::from("/tmp/h.json")));
            assert!(cli.quiet);
        }

        #[test]
        fn test_log_format() {
            let cli = parse(&["--log-format", "json", "tui"]);
            assert_eq!(cli.log_format, LogFormatArg::Json);
        }

        #[test]
        fn test_color_default() {
            let cli = parse(&["tui"]);
            assert_eq!(cli.color, ColorArg::Auto);
        }
    }

    mod press_tests {
        use super::*;

        #[test]
        fn test_press_labels() {
            let cli = parse(&["press", "5", "+", "3", "="]);
            let Some(Commands::Press(args)) = cli.command else {
                panic!("expected press");
            };
            assert_eq!(args.labels, vec!["5", "+", "3", "="]);
            assert!(!args.expression);
        }

        #[test]
        fn test_press_hyphen_labels() {
            let cli = parse(&["press", "9", "-", "4", "+/-"]);
            let Some(Commands::Press(args)) = cli.command else {
                panic!("expected press");
            };
            assert_eq!(args.labels, vec!["9", "-", "4", "+/-"]);
        }

        #[test]
        fn test_press_requires_labels() {
            assert!(Cli::try_parse_from(["abacus", "press"]).is_err());
        }
    }

    mod history_tests {
        use super::*;

        #[test]
        fn test_history_default_action() {
            let cli = parse(&["history"]);
            assert_eq!(
                cli.command,
                Some(Commands::History(HistoryArgs { action: None }))
            );
        }

        #[test]
        fn test_history_delete() {
            let cli = parse(&["history", "delete", "2"]);
            assert_eq!(
                cli.command,
                Some(Commands::History(HistoryArgs {
                    action: Some(HistoryAction::Delete { index: 2 })
                }))
            );
        }

        #[test]
        fn test_history_delete_rejects_non_number() {
            assert!(Cli::try_parse_from(["abacus", "history", "delete", "x"]).is_err());
        }

        #[test]
        fn test_history_list_json() {
            let cli = parse(&["history", "list", "--json"]);
            assert_eq!(
                cli.command,
                Some(Commands::History(HistoryArgs {
                    action: Some(HistoryAction::List { json: true })
                }))
            );
        }
    }

    mod conversion_tests {
        use super::*;
        use crate::config::ColorChoice;
        use crate::logging::LogFormat;

        #[test]
        fn test_color_arg_conversion() {
            assert_eq!(ColorChoice::from(ColorArg::Auto), ColorChoice::Auto);
            assert_eq!(ColorChoice::from(ColorArg::Always), ColorChoice::Always);
            assert_eq!(ColorChoice::from(ColorArg::Never), ColorChoice::Never);
        }

        #[test]
        fn test_log_format_conversion() {
            assert_eq!(LogFormat::from(LogFormatArg::Pretty), LogFormat::Pretty);
            assert_eq!(LogFormat::from(LogFormatArg::Compact), LogFormat::Compact);
            assert_eq!(LogFormat::from(LogFormatArg::Json), LogFormat::Json);
        }
    }
}
