//! Terminal backends.
//!
//! The loop only talks to [`Backend`]: enter/leave the terminal, query its
//! size, draw a canvas, and optionally start an input source.
//! [`CrosstermBackend`] drives a real terminal; [`TestBackend`] records
//! frames in memory for tests.

use std::io::{self, Stdout, Write};

use crossterm::cursor::{Hide, Show};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};
use tracing::debug;

use crate::config::Config;
use crate::pipeline::{EventSender, InputReader};

use super::canvas::Canvas;
use super::diff::DiffRenderer;

pub trait Backend {
    /// Prepare the terminal (raw mode, alternate screen, mouse capture).
    fn enter(&mut self, config: &Config) -> io::Result<()>;

    /// Restore the terminal. Called on every exit path of a run.
    fn leave(&mut self) -> io::Result<()>;

    fn size(&self) -> io::Result<(u16, u16)>;

    fn draw(&mut self, canvas: &Canvas) -> io::Result<()>;

    /// Start feeding events into `sender`. Backends without a live input
    /// source leave it to the caller.
    fn start_input(&mut self, sender: EventSender) -> io::Result<()> {
        let _ = sender;
        Ok(())
    }
}

// =============================================================================
// CrosstermBackend
// =============================================================================

pub struct CrosstermBackend<W: Write = Stdout> {
    out: W,
    diff: DiffRenderer,
    reader: Option<InputReader>,
    active: bool,
    mouse_capture: bool,
    alternate_screen: bool,
}

impl CrosstermBackend<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> CrosstermBackend<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            diff: DiffRenderer::new(),
            reader: None,
            active: false,
            mouse_capture: false,
            alternate_screen: false,
        }
    }
}

impl<W: Write> Backend for CrosstermBackend<W> {
    fn enter(&mut self, config: &Config) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        self.active = true;
        self.alternate_screen = config.alternate_screen();
        self.mouse_capture = config.mouse_capture();

        if self.alternate_screen {
            execute!(self.out, EnterAlternateScreen)?;
        }
        execute!(self.out, Hide, Clear(ClearType::All))?;
        if self.mouse_capture {
            execute!(self.out, EnableMouseCapture)?;
        }
        self.diff.invalidate();
        debug!(
            mouse_capture = self.mouse_capture,
            alternate_screen = self.alternate_screen,
            "terminal entered"
        );
        Ok(())
    }

    fn leave(&mut self) -> io::Result<()> {
        if let Some(mut reader) = self.reader.take() {
            reader.stop();
        }
        if !self.active {
            return Ok(());
        }
        self.active = false;

        // Keep going on failure so the terminal is restored as far as possible
        let mut result = Ok(());
        if self.mouse_capture {
            result = result.and(execute!(self.out, DisableMouseCapture));
        }
        result = result.and(execute!(self.out, Show));
        if self.alternate_screen {
            result = result.and(execute!(self.out, LeaveAlternateScreen));
        }
        result = result.and(terminal::disable_raw_mode());
        debug!("terminal restored");
        result
    }

    fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    fn draw(&mut self, canvas: &Canvas) -> io::Result<()> {
        self.diff.render(&mut self.out, canvas).map(|_| ())
    }

    fn start_input(&mut self, sender: EventSender) -> io::Result<()> {
        self.reader = Some(InputReader::spawn(sender)?);
        Ok(())
    }
}

impl<W: Write> Drop for CrosstermBackend<W> {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

// =============================================================================
// TestBackend
// =============================================================================

/// In-memory backend. Records every drawn canvas.
#[derive(Debug, Clone)]
pub struct TestBackend {
    width: u16,
    height: u16,
    frames: Vec<Canvas>,
    entered: bool,
    left: bool,
    fail_at_draw: Option<usize>,
}

impl TestBackend {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            frames: Vec::new(),
            entered: false,
            left: false,
            fail_at_draw: None,
        }
    }

    /// Make the `n`th draw (zero-based) fail with an I/O error.
    pub fn fail_at_draw(mut self, n: usize) -> Self {
        self.fail_at_draw = Some(n);
        self
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }

    pub fn frames(&self) -> &[Canvas] {
        &self.frames
    }

    pub fn last_frame(&self) -> Option<&Canvas> {
        self.frames.last()
    }

    pub fn draw_count(&self) -> usize {
        self.frames.len()
    }

    pub fn entered(&self) -> bool {
        self.entered
    }

    /// Whether the terminal was restored.
    pub fn left(&self) -> bool {
        self.left
    }
}

impl Backend for TestBackend {
    fn enter(&mut self, _config: &Config) -> io::Result<()> {
        self.entered = true;
        self.left = false;
        Ok(())
    }

    fn leave(&mut self) -> io::Result<()> {
        self.left = true;
        Ok(())
    }

    fn size(&self) -> io::Result<(u16, u16)> {
        Ok((self.width, self.height))
    }

    fn draw(&mut self, canvas: &Canvas) -> io::Result<()> {
        if self.fail_at_draw == Some(self.frames.len()) {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "test backend draw failure"));
        }
        self.frames.push(canvas.clone());
        Ok(())
    }
}
