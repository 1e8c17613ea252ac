//! CLI configuration
//!
//! Settings are layered: built-in defaults, then the YAML file given with
//! `--config`, then command-line flags and `ABACUS_STORE`.

use std::fs;
use std::path::{Path, PathBuf};

use abacus::config::SessionConfig;
use serde::{Deserialize, Serialize};

use crate::commands::Cli;
use crate::error::{CliError, CliResult};
use crate::logging::{LogConfig, LogFormat};

/// File name of the history store inside the data directory
pub const STORE_FILE_NAME: &str = "history.json";

/// CLI verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// Quiet - errors only
    Quiet,
    /// Normal - default output
    #[default]
    Normal,
    /// Verbose - extra output
    Verbose,
    /// Debug - maximum output
    Debug,
}

impl Verbosity {
    /// Maps `-q` and the `-v` count to a level
    #[must_use]
    pub const fn from_flags(quiet: bool, verbose: u8) -> Self {
        if quiet {
            return Self::Quiet;
        }
        match verbose {
            0 => Self::Normal,
            1 => Self::Verbose,
            _ => Self::Debug,
        }
    }

    /// Check if quiet mode
    #[must_use]
    pub const fn is_quiet(self) -> bool {
        matches!(self, Self::Quiet)
    }

    /// Check if verbose or higher
    #[must_use]
    pub const fn is_verbose(self) -> bool {
        matches!(self, Self::Verbose | Self::Debug)
    }
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    /// Always use colors
    Always,
    /// Use colors when output is a terminal
    #[default]
    Auto,
    /// Never use colors
    Never,
}

impl ColorChoice {
    /// Forces colors on or off; `Auto` leaves terminal detection in charge
    pub fn apply(self) {
        match self {
            Self::Always => console::set_colors_enabled(true),
            Self::Never => console::set_colors_enabled(false),
            Self::Auto => {}
        }
    }
}

/// Contents of the `--config` YAML file
///
/// ```yaml
/// store: /home/me/.abacus.json
/// session:
///   storage_key: calculatorHistory
///   history_limit: 50
///   display:
///     max_len: 15
///     precision: 10
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    /// History file
    pub store: Option<PathBuf>,
    /// Calculator session settings
    pub session: SessionConfig,
}

impl ConfigFile {
    /// Reads and parses a YAML config file
    pub fn load(path: &Path) -> CliResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            CliError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::parse(&text).map_err(|e| match e {
            CliError::Config { message } => {
                CliError::config(format!("{}: {message}", path.display()))
            }
            other => other,
        })
    }

    /// Parses YAML text
    pub fn parse(text: &str) -> CliResult<Self> {
        serde_yaml_ng::from_str(text).map_err(|e| CliError::config(e.to_string()))
    }
}

/// Default history file in the platform data directory
#[must_use]
pub fn default_store_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("abacus").join(STORE_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(STORE_FILE_NAME))
}

/// CLI configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Verbosity level
    pub verbosity: Verbosity,
    /// Color output choice
    pub color: ColorChoice,
    /// History file
    pub store: PathBuf,
    /// Calculator session settings
    pub session: SessionConfig,
    /// Log destination; `None` means stderr
    pub log_file: Option<PathBuf>,
    /// Log output format
    pub log_format: LogFormat,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            verbosity: Verbosity::Normal,
            color: ColorChoice::Auto,
            store: default_store_path(),
            session: SessionConfig::default(),
            log_file: None,
            log_format: LogFormat::default(),
        }
    }
}

impl CliConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the effective configuration from parsed arguments
    pub fn from_cli(cli: &Cli) -> CliResult<Self> {
        let mut config = Self::new();
        if let Some(path) = &cli.config {
            config = config.with_file(ConfigFile::load(path)?);
        }
        if let Some(store) = &cli.store {
            config = config.with_store(store.clone());
        }
        Ok(config
            .with_verbosity(Verbosity::from_flags(cli.quiet, cli.verbose))
            .with_color(cli.color.clone().into())
            .with_log_file(cli.log_file.clone())
            .with_log_format(cli.log_format.clone().into()))
    }

    /// Applies a config file on top of this configuration
    #[must_use]
    pub fn with_file(mut self, file: ConfigFile) -> Self {
        if let Some(store) = file.store {
            self.store = store;
        }
        self.session = file.session;
        self
    }

    /// Set verbosity
    #[must_use]
    pub const fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set color choice
    #[must_use]
    pub const fn with_color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }

    /// Set the history file
    #[must_use]
    pub fn with_store(mut self, store: impl Into<PathBuf>) -> Self {
        self.store = store.into();
        self
    }

    /// Set the session settings
    #[must_use]
    pub fn with_session(mut self, session: SessionConfig) -> Self {
        self.session = session;
        self
    }

    /// Set the log file
    #[must_use]
    pub fn with_log_file(mut self, log_file: Option<PathBuf>) -> Self {
        self.log_file = log_file;
        self
    }

    /// Set the log format
    #[must_use]
    pub const fn with_log_format(mut self, format: LogFormat) -> Self {
        self.log_format = format;
        self
    }

    /// Logging setup for this run
    ///
    /// The terminal UI owns the screen, so without a log file its logs are
    /// dropped.
    #[must_use]
    pub fn log_config(&self, interactive: bool) -> LogConfig {
        LogConfig::from_verbosity(self.verbosity)
            .with_format(self.log_format)
            .with_log_file(self.log_file.clone())
            .with_enabled(!interactive || self.log_file.is_some())
    }

    /// Renders the configuration as YAML
    pub fn to_yaml(&self) -> CliResult<String> {
        serde_yaml_ng::to_string(self).map_err(|e| CliError::config(e.to_string()))
    }
}
