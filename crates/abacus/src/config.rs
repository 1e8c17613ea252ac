//! Session configuration

use serde::{Deserialize, Serialize};

use crate::core::format::DisplayFormat;

/// Storage key the browser calculator has always used
pub const DEFAULT_STORAGE_KEY: &str = "calculatorHistory";

/// Settings for one calculator session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Key the history payload is stored under
    pub storage_key: String,
    /// Display overflow rule
    pub display: DisplayFormat,
    /// Maximum history length; `None` keeps everything
    pub history_limit: Option<usize>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionConfig {
    /// Creates the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            display: DisplayFormat::default(),
            history_limit: None,
        }
    }

    /// Sets the storage key
    #[must_use]
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Sets the longest display text shown verbatim
    #[must_use]
    pub fn with_display_max_len(mut self, max_len: usize) -> Self {
        self.display.max_len = max_len;
        self
    }

    /// Sets the significant digits used when the display overflows
    #[must_use]
    pub fn with_display_precision(mut self, precision: usize) -> Self {
        self.display.precision = precision;
        self
    }

    /// Caps the history length
    #[must_use]
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = Some(limit);
        self
    }
}
