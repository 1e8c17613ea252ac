//! Terminal front-end

mod app;
mod input;
mod keypad;
mod ui;

use std::io;

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind, MouseButton,
        MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::Backend, backend::CrosstermBackend, layout::Rect, Terminal};

use crate::store::KeyValueStore;

pub use app::{CalculatorApp, Screen};
pub use input::{InputHandler, KeyAction};
pub use keypad::{Keypad, KeypadButton, KeypadWidget};
pub use ui::{keypad_area, render, CalculatorUI};

/// Takes over the terminal and runs the calculator until the user quits.
///
/// The terminal is restored even when the event loop fails.
pub fn run<S: KeyValueStore>(app: &mut CalculatorApp<S>) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = event_loop(&mut terminal, app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn event_loop<B, S>(terminal: &mut Terminal<B>, app: &mut CalculatorApp<S>) -> io::Result<()>
where
    B: Backend,
    S: KeyValueStore,
{
    let input = InputHandler::new();
    tracing::info!("terminal session started");

    while !app.should_quit() {
        terminal.draw(|frame| render(app, frame))?;

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                app.handle_action(input.handle_key(key));
            }
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                let size = terminal.size()?;
                let area = keypad_area(Rect::new(0, 0, size.width, size.height));
                app.click(area, mouse.column, mouse.row);
            }
            _ => {}
        }
    }

    tracing::info!(entries = app.history().len(), "terminal session ended");
    Ok(())
}
