//! Rendering capability
//!
//! The controller pushes the display text and the history list to a
//! [`Renderer`] and never inspects what it does with them.

use crate::core::history::HistoryEntry;

/// Something that can show the calculator display and history list
pub trait Renderer {
    /// Shows the display text
    fn show_display(&mut self, text: &str);

    /// Shows the history, oldest first. Implementations choose the order.
    fn show_history(&mut self, entries: &[HistoryEntry]);
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    fn show_display(&mut self, text: &str) {
        (**self).show_display(text);
    }

    fn show_history(&mut self, entries: &[HistoryEntry]) {
        (**self).show_history(entries);
    }
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn show_display(&mut self, text: &str) {
        (**self).show_display(text);
    }

    fn show_history(&mut self, entries: &[HistoryEntry]) {
        (**self).show_history(entries);
    }
}

/// Renderer that discards everything
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn show_display(&mut self, _text: &str) {}

    fn show_history(&mut self, _entries: &[HistoryEntry]) {}
}

/// Renderer that keeps the last frame and counts refreshes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingRenderer {
    /// Last display text shown
    pub display: String,
    /// Last history lines shown, oldest first
    pub history: Vec<String>,
    /// Number of display refreshes
    pub display_updates: usize,
    /// Number of history refreshes
    pub history_updates: usize,
}

impl RecordingRenderer {
    /// Creates an empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Renderer for RecordingRenderer {
    fn show_display(&mut self, text: &str) {
        self.display = text.to_string();
        self.display_updates += 1;
    }

    fn show_history(&mut self, entries: &[HistoryEntry]) {
        self.history = entries.iter().map(HistoryEntry::line).collect();
        self.history_updates += 1;
    }
}
