use std::io::{self, Stdout, Write};

use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};

use crate::table::Table;

/// Where finished tables go. Two operations only: wipe the target and show a
/// table. Presenting is all-or-nothing from the loop's point of view; a
/// cancellation never leaves a half-drawn grid behind.
pub trait RenderSink {
    fn clear(&mut self) -> io::Result<()>;
    fn present(&mut self, table: &Table) -> io::Result<()>;
}

//Plain stdout target used by the CLI binary.
pub struct TerminalSink {
    out: Stdout,
}

impl TerminalSink {
    pub fn new() -> Self {
        TerminalSink { out: io::stdout() }
    }
}

impl Default for TerminalSink {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderSink for TerminalSink {
    fn clear(&mut self) -> io::Result<()> {
        execute!(self.out, Clear(ClearType::All), MoveTo(0, 0))
    }

    fn present(&mut self, table: &Table) -> io::Result<()> {
        write!(self.out, "{}", table)?;
        self.out.flush()
    }
}
