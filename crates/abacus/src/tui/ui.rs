//! Terminal rendering

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, StatefulWidget, Widget},
    Frame,
};

use super::app::CalculatorApp;
use super::keypad::KeypadWidget;
use crate::store::KeyValueStore;

/// Renders the calculator UI to the frame
pub fn render<S: KeyValueStore>(app: &CalculatorApp<S>, frame: &mut Frame) {
    let area = frame.area();
    frame.render_widget(CalculatorUI::new(app), area);
}

/// Returns where the keypad is drawn inside a terminal of size `area`
#[must_use]
pub fn keypad_area(area: Rect) -> Rect {
    horizontal_layout(area)[1]
}

/// Main area, keypad, help sidebar
fn horizontal_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Horizontal)
        .margin(1)
        .constraints([
            Constraint::Min(30),
            Constraint::Length(KEYPAD_WIDTH),
            Constraint::Length(24),
        ])
        .split(area)
        .to_vec()
}

/// Calculator UI widget
#[derive(Debug)]
pub struct CalculatorUI<'a, S> {
    app: &'a CalculatorApp<S>,
}

impl<'a, S: KeyValueStore> CalculatorUI<'a, S> {
    /// Creates a new calculator UI widget
    #[must_use]
    pub fn new(app: &'a CalculatorApp<S>) -> Self {
        Self { app }
    }

    fn main_layout(area: Rect) -> Vec<Rect> {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Expression
                Constraint::Length(3), // Display
                Constraint::Min(5),    // History
                Constraint::Length(3), // Status
            ])
            .split(area)
            .to_vec()
    }

    fn render_expression(&self, area: Rect, buf: &mut Buffer) {
        let text = self.app.pending_expression().unwrap_or_default();
        Paragraph::new(Span::styled(text, Style::default().fg(Color::Gray)))
            .block(
                Block::default()
                    .title(" Expression ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .render(area, buf);
    }

    fn render_display(&self, area: Rect, buf: &mut Buffer) {
        let style = if self.app.status().is_some() {
            Style::default().fg(Color::Red)
        } else {
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD)
        };

        Paragraph::new(Line::from(Span::styled(self.app.display(), style)).right_aligned())
            .block(
                Block::default()
                    .title(" Display ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow)),
            )
            .render(area, buf);
    }

    fn render_history(&self, area: Rect, buf: &mut Buffer) {
        let items: Vec<ListItem> = self
            .app
            .history()
            .iter()
            .rev()
            .map(|entry| ListItem::new(Span::styled(entry.line(), Style::default().fg(Color::Gray))))
            .collect();
        let count = items.len();

        let list = List::new(items)
            .block(
                Block::default()
                    .title(format!(" History ({count}) "))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Blue)),
            )
            .highlight_style(
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        let mut state = ListState::default().with_selected(self.app.selected());
        StatefulWidget::render(list, area, buf, &mut state);
    }

    fn render_status(&self, area: Rect, buf: &mut Buffer) {
        let line = match self.app.status() {
            Some(message) => Line::from(Span::styled(
                format!("✗ {message}"),
                Style::default().fg(Color::Red),
            )),
            None => Line::from(Span::styled(
                self.app.phase().to_string(),
                Style::default().fg(Color::DarkGray),
            )),
        };
        Paragraph::new(line)
            .block(
                Block::default()
                    .title(" Status ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Magenta)),
            )
            .render(area, buf);
    }

    fn render_help(area: Rect, buf: &mut Buffer) {
        let items: Vec<ListItem> = HELP_SHORTCUTS
            .iter()
            .map(|(key, desc)| {
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{key:>9}"), Style::default().fg(Color::Yellow)),
                    Span::raw(" "),
                    Span::styled(*desc, Style::default().fg(Color::Gray)),
                ]))
            })
            .collect();

        let list = List::new(items).block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        Widget::render(list, area, buf);
    }
}

impl<S: KeyValueStore> Widget for CalculatorUI<'_, S> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Block::default()
            .title(TITLE)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .render(area, buf);

        let columns = horizontal_layout(area);
        let [main, keypad, help] = [columns[0], columns[1], columns[2]];

        let rows = Self::main_layout(main);
        self.render_expression(rows[0], buf);
        self.render_display(rows[1], buf);
        self.render_history(rows[2], buf);
        self.render_status(rows[3], buf);

        KeypadWidget::new(self.app.keypad()).render(keypad, buf);
        Self::render_help(help, buf);
    }
}

/// Keypad column width: four 5-cell buttons plus borders
const KEYPAD_WIDTH: u16 = 22;

/// Window title
pub const TITLE: &str = " abacus ";

/// Key bindings shown in the sidebar
pub const HELP_SHORTCUTS: &[(&str, &str)] = &[
    ("0-9 .", "Digits"),
    ("+ - * /", "Operator"),
    ("Enter =", "Equals"),
    ("Esc", "AC"),
    ("Bksp", "DEL"),
    ("n", "+/-"),
    ("%", "Percent"),
    ("↑/↓", "Select"),
    ("Del", "Delete entry"),
    ("Ctrl+L", "Clear history"),
    ("q Ctrl+C", "Quit"),
];
