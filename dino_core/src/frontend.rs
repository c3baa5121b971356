//! Render sinks for live display.

use std::io::{self, Stdout, Write};
use std::thread;
use std::time::Duration;

use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};
use tracing::warn;

use crate::diagnostics::{Location, Warning};
use crate::world::World;

/// Receives frames and warnings from the interpreter.
pub trait Frontend {
    /// Draw one frame of `world`.
    fn draw(&mut self, world: &World) -> io::Result<()>;

    /// Block for the refresh interval after a frame.
    fn pause(&mut self, interval: Duration) {
        thread::sleep(interval);
    }

    fn warning(&mut self, _location: &Location, _warning: &Warning) {}
}

/// Clears the terminal and redraws the grid on every frame. Warnings are
/// printed even when frames are never requested.
pub struct TerminalFrontend<W: Write = Stdout> {
    out: W,
}

impl TerminalFrontend<Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> TerminalFrontend<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Frontend for TerminalFrontend<W> {
    fn draw(&mut self, world: &World) -> io::Result<()> {
        execute!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
        write!(self.out, "{world}")?;
        self.out.flush()
    }

    fn warning(&mut self, location: &Location, warning: &Warning) {
        if let Err(err) = writeln!(self.out, "Warning: {warning} ({location})") {
            warn!(target: "dino::interp", error = %err, "warning.print_failed");
        }
    }
}

/// Discards frames and never sleeps.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessFrontend;

impl Frontend for HeadlessFrontend {
    fn draw(&mut self, _world: &World) -> io::Result<()> {
        Ok(())
    }

    fn pause(&mut self, _interval: Duration) {}
}
