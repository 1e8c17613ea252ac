//! Calculator controller
//!
//! [`Calculator`] ties the input state machine, the history ledger and a
//! renderer together. Front-ends own exactly one of these and feed it tokens.

use crate::config::SessionConfig;
use crate::core::history::{HistoryEntry, Ledger};
use crate::core::machine::{CalculatorState, Outcome, Phase};
use crate::core::token::Token;
use crate::core::CalcResult;
use crate::render::Renderer;
use crate::store::KeyValueStore;

/// A calculator session
#[derive(Debug)]
pub struct Calculator<S, R> {
    state: CalculatorState,
    ledger: Ledger<S>,
    renderer: R,
    config: SessionConfig,
}

impl<S: KeyValueStore, R: Renderer> Calculator<S, R> {
    /// Starts a session with the default configuration
    pub fn new(store: S, renderer: R) -> Self {
        Self::with_config(store, renderer, SessionConfig::default())
    }

    /// Starts a session, loading history from `store` and drawing the first frame
    pub fn with_config(store: S, renderer: R, config: SessionConfig) -> Self {
        let ledger =
            Ledger::load(store, config.storage_key.clone()).with_limit(config.history_limit);
        let mut calculator = Self {
            state: CalculatorState::new(),
            ledger,
            renderer,
            config,
        };
        calculator.refresh();
        calculator
    }

    /// Applies one button press
    pub fn press(&mut self, token: Token) -> Outcome {
        let outcome = self.state.apply(token);
        tracing::debug!(
            token = %token,
            display = %self.state.display_text(),
            phase = %self.state.phase(),
            "token applied"
        );

        if let Outcome::Completed(entry) = &outcome {
            tracing::info!(calculation = %entry, "calculation completed");
            self.ledger.append(*entry);
            self.renderer.show_history(self.ledger.entries());
        }
        self.renderer.show_display(&self.display());
        outcome
    }

    /// Applies a button press given by its label (`7`, `+`, `AC`, `+/-`, ...)
    pub fn press_label(&mut self, label: &str) -> CalcResult<Outcome> {
        let token: Token = label.parse()?;
        Ok(self.press(token))
    }

    /// Applies a sequence of labels, stopping at the first unknown one
    pub fn press_labels<I, L>(&mut self, labels: I) -> CalcResult<Vec<Outcome>>
    where
        I: IntoIterator<Item = L>,
        L: AsRef<str>,
    {
        labels
            .into_iter()
            .map(|label| self.press_label(label.as_ref()))
            .collect()
    }

    /// Deletes the history entry at `index` (0 = oldest)
    pub fn delete_history(&mut self, index: usize) -> Option<HistoryEntry> {
        let removed = self.ledger.delete(index);
        if removed.is_some() {
            self.renderer.show_history(self.ledger.entries());
        }
        removed
    }

    /// Deletes every history entry
    pub fn clear_history(&mut self) {
        self.ledger.clear();
        self.renderer.show_history(self.ledger.entries());
    }

    /// Redraws both the display and the history
    pub fn refresh(&mut self) {
        self.renderer.show_display(&self.display());
        self.renderer.show_history(self.ledger.entries());
    }

    /// Returns the display text as rendered
    #[must_use]
    pub fn display(&self) -> String {
        self.state.display(&self.config.display)
    }

    /// Returns the in-progress expression, if an operator is pending
    #[must_use]
    pub fn pending_expression(&self) -> Option<String> {
        self.state.pending_expression()
    }

    /// Returns the current phase
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// Returns the input state
    #[must_use]
    pub fn state(&self) -> &CalculatorState {
        &self.state
    }

    /// Returns the history entries, oldest first
    #[must_use]
    pub fn history(&self) -> &[HistoryEntry] {
        self.ledger.entries()
    }

    /// Returns the history ledger
    #[must_use]
    pub fn ledger(&self) -> &Ledger<S> {
        &self.ledger
    }

    /// Returns the history ledger mutably, for collecting write failures
    pub fn ledger_mut(&mut self) -> &mut Ledger<S> {
        &mut self.ledger
    }

    /// Returns the renderer
    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Returns the renderer mutably
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Returns the session configuration
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}
