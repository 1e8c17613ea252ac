//! Logging setup using `tracing-subscriber`
//!
//! `RUST_LOG` overrides the level picked from `-q`/`-v`.

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::Level;
use tracing_subscriber::fmt::{self, writer::BoxMakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::Verbosity;
use crate::error::{CliError, CliResult};

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line human-readable output
    Pretty,
    /// Single-line output
    #[default]
    Compact,
    /// One JSON object per event
    Json,
}

/// Logging behaviour for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Most verbose level emitted
    pub level: Level,
    /// Output format
    pub format: LogFormat,
    /// Log file; stderr when `None`
    pub log_file: Option<PathBuf>,
    /// Whether a subscriber is installed at all
    pub enabled: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            format: LogFormat::default(),
            log_file: None,
            enabled: true,
        }
    }
}

impl LogConfig {
    /// Quiet: error, normal: warn, `-v`: info, `-vv`: debug
    #[must_use]
    pub fn from_verbosity(verbosity: Verbosity) -> Self {
        let level = match verbosity {
            Verbosity::Quiet => Level::ERROR,
            Verbosity::Normal => Level::WARN,
            Verbosity::Verbose => Level::INFO,
            Verbosity::Debug => Level::DEBUG,
        };
        Self {
            level,
            ..Self::default()
        }
    }

    /// Set output format
    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the log file path (writes to stderr when None)
    #[must_use]
    pub fn with_log_file(mut self, path: Option<PathBuf>) -> Self {
        self.log_file = path;
        self
    }

    /// Turn logging on or off
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Filter directive used when `RUST_LOG` is unset
    #[must_use]
    pub fn directive(&self) -> String {
        let level = self.level.as_str().to_lowercase();
        format!("warn,abacus={level},abacus_cli={level}")
    }
}

/// Installs the global subscriber. Call once at startup.
pub fn init_logging(config: &LogConfig) -> CliResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let (writer, ansi) = match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        None => (
            BoxMakeWriter::new(io::stderr),
            console::colors_enabled_stderr(),
        ),
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.directive()));
    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(writer))
            .try_init(),
        LogFormat::Compact => registry
            .with(
                fmt::layer()
                    .compact()
                    .with_writer(writer)
                    .with_ansi(ansi)
                    .with_target(false),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().pretty().with_writer(writer).with_ansi(ansi))
            .try_init(),
    };
    result.map_err(|e| CliError::config(format!("logging: {e}")))
}
