// SPDX-License-Identifier: MIT
//
// Display abstraction and the run loop.
//
// A `Display` knows its size, blocks for the next event, and renders a
// `CellBuffer`. An `Application` turns each event into the buffer to show.
// `run` drives the two:
//
//   1. synthesize `Resize(display_size)` and hand it to the application;
//      a stop here ends the loop before anything is rendered;
//   2. render the returned buffer;
//   3. wait for an event, deliver it, render, repeat.
//
// Either side can end the loop. The application returns `Flow::Stop`,
// optionally carrying an exit value. The display returns `Ok(None)` from
// `wait_for_event` (scripted events exhausted, input closed), which is
// always a valueless stop. Rendering and waiting strictly alternate: no
// frame is skipped or coalesced.

mod line;
mod record;
mod terminal;

use std::fmt;
use std::str::FromStr;

use tracing::{debug, info, trace, warn};

use crate::buffer::CellBuffer;
use crate::error::{Error, Result};
use crate::event::Event;
use crate::geometry::Size;

pub use line::LineDisplay;
pub use record::RecordDisplay;
pub use terminal::{TerminalDisplay, render_frame};

// ─── Flow ───────────────────────────────────────────────────────────────────

/// What the application tells the run loop after consuming an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow<T, E> {
    /// Render `T` and keep going.
    Continue(T),
    /// End the loop, optionally with an exit value.
    Stop(Option<E>),
}

// ─── Application ────────────────────────────────────────────────────────────

/// The program side of the run loop.
pub trait Application {
    /// Value an application may hand back when it stops.
    type Exit;

    /// Consume one event and return the buffer to display, or stop.
    ///
    /// The first event is always a [`Event::Resize`] with the display's
    /// size.
    fn consume_event(&mut self, event: Event) -> Flow<&CellBuffer, Self::Exit>;
}

// ─── Display ────────────────────────────────────────────────────────────────

/// A backend that can show cell buffers and produce events.
pub trait Display {
    /// Called once before the loop starts.
    ///
    /// # Errors
    ///
    /// Backend setup failures.
    fn begin(&mut self) -> Result<()> {
        Ok(())
    }

    /// Called once after the loop ends, also when it failed.
    ///
    /// # Errors
    ///
    /// Backend teardown failures.
    fn end(&mut self) -> Result<()> {
        Ok(())
    }

    /// Current display size in cells.
    fn display_size(&self) -> Size;

    /// Block until the next event. `Ok(None)` ends the loop without a
    /// value.
    ///
    /// # Errors
    ///
    /// Backend input failures.
    fn wait_for_event(&mut self) -> Result<Option<Event>>;

    /// Render `image`. The display must copy anything it wants to keep.
    ///
    /// # Errors
    ///
    /// Backend output failures.
    fn display_image(&mut self, image: &CellBuffer) -> Result<()>;
}

// ─── Run Loop ───────────────────────────────────────────────────────────────

/// Drive `app` on `display` until either side stops.
///
/// Returns the application's exit value, or `None` for a valueless stop.
/// [`Display::end`] runs whenever [`Display::begin`] succeeded.
///
/// # Errors
///
/// Propagates backend errors from any [`Display`] method.
pub fn run<D, A>(display: &mut D, app: &mut A) -> Result<Option<A::Exit>>
where
    D: Display + ?Sized,
    A: Application,
{
    display.begin()?;
    let outcome = run_loop(display, app);
    let ended = display.end();
    let exit = outcome?;
    ended?;
    Ok(exit)
}

fn run_loop<D, A>(display: &mut D, app: &mut A) -> Result<Option<A::Exit>>
where
    D: Display + ?Sized,
    A: Application,
{
    let size = display.display_size();
    debug!(width = size.width, height = size.height, "run loop starting");

    let mut frames: u64 = 0;
    let mut event = Event::Resize(size);
    loop {
        trace!(?event, "delivering event");
        match app.consume_event(event) {
            Flow::Continue(image) => {
                display.display_image(image)?;
                frames += 1;
            }
            Flow::Stop(exit) => {
                debug!(frames, has_value = exit.is_some(), "application stopped");
                return Ok(exit);
            }
        }

        event = match display.wait_for_event()? {
            Some(next) => next,
            None => {
                debug!(frames, "display stopped");
                return Ok(None);
            }
        };
    }
}

// ─── Configuration ──────────────────────────────────────────────────────────

/// Which backend to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayKind {
    /// Raw-mode ANSI terminal.
    #[default]
    Terminal,
    /// Framed text on stdout, commands from stdin.
    Line,
    /// In-memory recording with scripted events.
    Record,
}

impl FromStr for DisplayKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "curses" | "terminal" => Ok(Self::Terminal),
            "print" | "line" => Ok(Self::Line),
            "test" | "record" => Ok(Self::Record),
            other => Err(Error::UnsupportedDisplay(other.to_owned())),
        }
    }
}

impl fmt::Display for DisplayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Terminal => "terminal",
            Self::Line => "line",
            Self::Record => "record",
        })
    }
}

/// Backend selection and sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayConfig {
    pub kind: DisplayKind,
    /// Size of an explicitly requested line display.
    pub line_size: Size,
    /// Size of the record display.
    pub record_size: Size,
    /// Size of the line display used when the terminal is unavailable.
    /// Fits an 80×25 screen with the frame around it.
    pub fallback_size: Size,
}

impl DisplayConfig {
    #[must_use]
    pub fn new(kind: DisplayKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            kind: DisplayKind::Terminal,
            line_size: Size::new(80, 25),
            record_size: Size::new(80, 25),
            fallback_size: Size::new(77, 22),
        }
    }
}

/// Open the backend named by `config`.
///
/// A terminal that cannot be opened falls back to a line display of
/// `config.fallback_size`.
///
/// # Errors
///
/// Terminal failures other than unavailability.
pub fn open_display(config: &DisplayConfig) -> Result<Box<dyn Display>> {
    match config.kind {
        DisplayKind::Terminal => match TerminalDisplay::new() {
            Ok(display) => {
                info!("using terminal display");
                Ok(Box::new(display))
            }
            Err(Error::TerminalUnavailable(reason)) => {
                warn!(%reason, "terminal unavailable, falling back to line display");
                Ok(Box::new(LineDisplay::stdio(config.fallback_size)))
            }
            Err(e) => Err(e),
        },
        DisplayKind::Line => {
            info!("using line display");
            Ok(Box::new(LineDisplay::stdio(config.line_size)))
        }
        DisplayKind::Record => {
            info!("using record display");
            Ok(Box::new(RecordDisplay::with_size(config.record_size)))
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
