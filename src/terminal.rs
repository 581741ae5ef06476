//! Terminal abstraction using crossterm

use std::io::{self, Stdout, Write};

use crossterm::{
    cursor,
    event::{self, Event},
    execute,
    terminal,
};

use crate::error::Result;

/// Owns raw mode and the alternate screen for the lifetime of the editor
pub struct Terminal {
    out: Stdout,
    /// Terminal width in columns
    cols: u16,
    /// Terminal height in rows
    rows: u16,
}

impl Terminal {
    /// Create a new terminal instance and enter raw mode
    pub fn new() -> Result<Self> {
        let (cols, rows) = terminal::size()?;
        terminal::enable_raw_mode()?;

        // From here on `Drop` restores the terminal, even if the screen
        // switch below fails
        let mut term = Self {
            out: io::stdout(),
            cols,
            rows,
        };
        execute!(term.out, terminal::EnterAlternateScreen, cursor::Hide)?;

        Ok(term)
    }

    /// Get terminal width
    pub fn cols(&self) -> u16 {
        self.cols
    }

    /// Get terminal height
    pub fn rows(&self) -> u16 {
        self.rows
    }

    /// Output handle that frames are queued on
    pub fn out(&mut self) -> &mut impl Write {
        &mut self.out
    }

    /// Read the next key or resize event (blocking)
    pub fn read_event(&mut self) -> Result<Event> {
        loop {
            match event::read()? {
                Event::Resize(cols, rows) => {
                    self.cols = cols;
                    self.rows = rows;
                    return Ok(Event::Resize(cols, rows));
                }
                ev @ Event::Key(_) => return Ok(ev),
                _ => {
                    // Ignore other events (mouse, focus, paste)
                }
            }
        }
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        // Restore terminal state
        let _ = execute!(self.out, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}
