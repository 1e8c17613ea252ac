//! Clickable keypad for the terminal calculator
//!
//! The keypad mirrors the browser button grid. Buttons can be clicked with the
//! mouse and light up when the matching key is typed.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Widget},
};

use crate::core::token::Token;

/// A single keypad button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeypadButton {
    /// The token this button sends
    pub token: Token,
    /// Whether the button is currently highlighted
    pub pressed: bool,
}

impl KeypadButton {
    /// Creates an unpressed button for `token`
    #[must_use]
    pub fn new(token: Token) -> Self {
        Self {
            token,
            pressed: false,
        }
    }

    /// Returns the text printed on the button
    #[must_use]
    pub fn label(&self) -> String {
        self.token.label()
    }

    /// Sets the pressed state
    pub fn set_pressed(&mut self, pressed: bool) {
        self.pressed = pressed;
    }

    fn style(&self) -> Style {
        if self.pressed {
            return Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD);
        }
        match self.token {
            Token::Digit(_) | Token::Decimal => Style::default().fg(Color::White),
            Token::Operator(_) => Style::default().fg(Color::Yellow),
            Token::Equals => Style::default().fg(Color::Green),
            Token::Clear | Token::Backspace => Style::default().fg(Color::Red),
            Token::ToggleSign | Token::Percent => Style::default().fg(Color::Cyan),
        }
    }
}

/// The keypad layout - a 5x4 grid of buttons
/// ```text
/// [AC] [DEL] [ % ] [ / ]
/// [ 7] [ 8 ] [ 9 ] [ * ]
/// [ 4] [ 5 ] [ 6 ] [ - ]
/// [ 1] [ 2 ] [ 3 ] [ + ]
/// [+/-][ 0 ] [ . ] [ = ]
/// ```
#[derive(Debug, Clone)]
pub struct Keypad {
    /// Buttons in row-major order
    buttons: Vec<KeypadButton>,
    cols: usize,
    rows: usize,
}

impl Default for Keypad {
    fn default() -> Self {
        Self::new()
    }
}

impl Keypad {
    /// Creates the standard calculator keypad
    #[must_use]
    pub fn new() -> Self {
        use crate::core::Operation::{Add, Divide, Multiply, Subtract};

        let tokens = [
            Token::Clear,
            Token::Backspace,
            Token::Percent,
            Token::Operator(Divide),
            Token::Digit(7),
            Token::Digit(8),
            Token::Digit(9),
            Token::Operator(Multiply),
            Token::Digit(4),
            Token::Digit(5),
            Token::Digit(6),
            Token::Operator(Subtract),
            Token::Digit(1),
            Token::Digit(2),
            Token::Digit(3),
            Token::Operator(Add),
            Token::ToggleSign,
            Token::Digit(0),
            Token::Decimal,
            Token::Equals,
        ];

        Self {
            buttons: tokens.into_iter().map(KeypadButton::new).collect(),
            cols: 4,
            rows: 5,
        }
    }

    /// Returns the number of buttons
    #[must_use]
    pub fn button_count(&self) -> usize {
        self.buttons.len()
    }

    /// Returns the grid dimensions (rows, cols)
    #[must_use]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Gets a button by index
    #[must_use]
    pub fn get_button(&self, index: usize) -> Option<&KeypadButton> {
        self.buttons.get(index)
    }

    /// Gets a button by row and column
    #[must_use]
    pub fn get_button_at(&self, row: usize, col: usize) -> Option<&KeypadButton> {
        if row < self.rows && col < self.cols {
            self.buttons.get(row * self.cols + col)
        } else {
            None
        }
    }

    /// Finds the button that sends `token`
    #[must_use]
    pub fn find_button(&self, token: Token) -> Option<usize> {
        self.buttons.iter().position(|b| b.token == token)
    }

    /// Releases all buttons
    pub fn release_all(&mut self) {
        for btn in &mut self.buttons {
            btn.set_pressed(false);
        }
    }

    /// Highlights the button for `token`, releasing every other one
    pub fn highlight(&mut self, token: Token) {
        self.release_all();
        if let Some(btn) = self.buttons.iter_mut().find(|b| b.token == token) {
            btn.set_pressed(true);
        }
    }

    /// Returns the token of the highlighted button
    #[must_use]
    pub fn highlighted(&self) -> Option<Token> {
        self.buttons.iter().find(|b| b.pressed).map(|b| b.token)
    }

    /// Returns an iterator over all buttons
    pub fn buttons(&self) -> impl Iterator<Item = &KeypadButton> {
        self.buttons.iter()
    }

    /// Returns an iterator over buttons with their (row, col) positions
    pub fn buttons_with_positions(&self) -> impl Iterator<Item = ((usize, usize), &KeypadButton)> {
        self.buttons
            .iter()
            .enumerate()
            .map(move |(i, btn)| ((i / self.cols, i % self.cols), btn))
    }

    /// Maps a click position inside `area` to the token under it
    #[must_use]
    pub fn hit_test(&self, area: Rect, x: u16, y: u16) -> Option<Token> {
        if x < area.x || y < area.y || x >= area.x + area.width || y >= area.y + area.height {
            return None;
        }

        let rel_x = x - area.x;
        let rel_y = y - area.y;

        // Border
        if rel_x == 0 || rel_y == 0 || rel_x >= area.width - 1 || rel_y >= area.height - 1 {
            return None;
        }

        let btn_width = (area.width - 2) / self.cols as u16;
        let btn_height = (area.height - 2) / self.rows as u16;
        if btn_width == 0 || btn_height == 0 {
            return None;
        }

        let col = ((rel_x - 1) / btn_width) as usize;
        let row = ((rel_y - 1) / btn_height) as usize;
        self.get_button_at(row, col).map(|b| b.token)
    }
}

/// Keypad widget for rendering
#[derive(Debug)]
pub struct KeypadWidget<'a> {
    keypad: &'a Keypad,
}

impl<'a> KeypadWidget<'a> {
    /// Creates a new keypad widget
    #[must_use]
    pub fn new(keypad: &'a Keypad) -> Self {
        Self { keypad }
    }
}

impl Widget for KeypadWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Block::default()
            .title(" Keypad ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .render(area, buf);

        let inner = Rect {
            x: area.x + 1,
            y: area.y + 1,
            width: area.width.saturating_sub(2),
            height: area.height.saturating_sub(2),
        };

        let (rows, cols) = self.keypad.dimensions();
        if inner.width < cols as u16 || inner.height < rows as u16 {
            return;
        }

        let btn_width = inner.width / cols as u16;
        let btn_height = inner.height / rows as u16;

        for ((row, col), btn) in self.keypad.buttons_with_positions() {
            let x = inner.x + (col as u16 * btn_width);
            let y = inner.y + (row as u16 * btn_height);

            let label = format!("[{}]", btn.label());
            let label_len = label.chars().count() as u16;
            if btn_width < label_len {
                continue;
            }
            let label_x = x + (btn_width - label_len) / 2;
            let label_y = y + btn_height / 2;

            if label_y < inner.y + inner.height && label_x < inner.x + inner.width {
                buf.set_span(label_x, label_y, &Span::styled(label, btn.style()), btn_width);
            }
        }
    }
}
