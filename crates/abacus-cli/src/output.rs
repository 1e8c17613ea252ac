//! Terminal output
//!
//! Results (display text, history lines, config) go to stdout so they can be
//! piped. Status messages go to stderr and respect `--quiet`.

use console::{style, Term};

use crate::config::Verbosity;

/// Writes results and status messages
#[derive(Debug)]
pub struct Reporter {
    out: Term,
    err: Term,
    verbosity: Verbosity,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(Verbosity::Normal)
    }
}

impl Reporter {
    /// Create a reporter for this verbosity
    #[must_use]
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            verbosity,
        }
    }

    /// Returns the verbosity this reporter was built with
    #[must_use]
    pub const fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Print a result line to stdout
    pub fn result(&self, line: &str) {
        let _ = self.out.write_line(line);
    }

    /// Print a numbered history line to stdout
    pub fn history_line(&self, index: usize, line: &str) {
        self.result(&history_row(index, line));
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if self.verbosity.is_quiet() {
            return;
        }
        let prefix = style("✓").green().bold().for_stderr();
        let _ = self.err.write_line(&format!("{prefix} {message}"));
    }

    /// Print a failure message
    pub fn failure(&self, message: &str) {
        // Always print failures, even in quiet mode
        let prefix = style("✗").red().bold().for_stderr();
        let _ = self.err.write_line(&format!("{prefix} {message}"));
    }

    /// Print an info message (only with `-v`)
    pub fn info(&self, message: &str) {
        if !self.verbosity.is_verbose() {
            return;
        }
        let prefix = style("ℹ").blue().bold().for_stderr();
        let _ = self.err.write_line(&format!("{prefix} {message}"));
    }
}

/// `[index] line`, with the index dimmed when colors are on
#[must_use]
pub fn history_row(index: usize, line: &str) -> String {
    format!("{} {line}", style(format!("[{index}]")).dim())
}
