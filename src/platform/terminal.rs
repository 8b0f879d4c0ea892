//! Terminal session setup and teardown

use std::io::{self, Write};

use crossterm::cursor::{self, MoveTo};
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{execute, queue};

/// Alternate screen with a hidden cursor, optionally in raw mode.
/// The terminal is restored on [`TerminalSession::restore`] or drop.
pub struct TerminalSession {
    raw: bool,
    active: bool,
}

impl TerminalSession {
    pub fn enter(raw: bool) -> io::Result<Self> {
        if raw {
            terminal::enable_raw_mode()?;
        }
        let session = Self { raw, active: true };
        execute!(
            io::stdout(),
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap,
        )?;
        Ok(session)
    }

    pub fn restore(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        execute!(
            io::stdout(),
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        )?;
        if self.raw {
            terminal::disable_raw_mode()?;
        }
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

/// Write lines starting at `row`, clearing what was there
pub fn show_message<W: Write>(out: &mut W, row: u16, lines: &[String]) -> io::Result<()> {
    for (i, line) in lines.iter().enumerate() {
        queue!(
            out,
            MoveTo(0, row + i as u16),
            Clear(ClearType::CurrentLine),
            Print(line)
        )?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_lines_written() {
        let mut out = Vec::new();
        let lines = vec!["Game over! Score: 3".to_string(), "Space to play".to_string()];
        show_message(&mut out, 42, &lines).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Game over! Score: 3"));
        assert!(text.contains("Space to play"));
        // MoveTo is 1-based on the wire
        assert!(text.contains("\x1b[43;1H"));
        assert!(text.contains("\x1b[44;1H"));
    }
}
