// SPDX-License-Identifier: MIT
//
// textland: demo of cell attributes and colors.
//
// The binary wires the demo application to a display picked from the
// TEXTLAND_DISPLAY environment variable:
//
//   terminal / curses → raw-mode ANSI terminal (default)
//   line / print      → framed text on stdout, commands on stdin
//   record / test     → in-memory, no events
//
// If the terminal cannot be used the toolkit falls back to the line
// display on its own. Logging goes to stderr and is off unless RUST_LOG
// asks for it, so it never lands on the screen being drawn.
//
// Screen layout (80 columns):
//
//   ┌────────────────────────────────────────────┐
//   │         TextLand Cell Character ...         │  ← row 0, centred
//   │         ===========================         │  ← row 1
//   │                                             │
//   │ Type 'q' to quit                            │  ← row 3, green on red
//   │                                             │
//   │                                             │
//   │           REVERSE                           │  ← rows 6..=8
//   │           UNDERLINE                         │
//   │           BOTH                              │
//   └────────────────────────────────────────────┘

use std::env;
use std::io;
use std::process;

use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use tl_term::{
    Application, Attr, CellBuffer, Color, DisplayConfig, DisplayKind, DrawingContext, Event, Flow,
    Key, Size, open_display, run,
};

const TITLE: &str = "TextLand Cell Character Attribute and Colors Demo Application";

/// Environment variable naming the display backend.
const DISPLAY_VAR: &str = "TEXTLAND_DISPLAY";

// ─── Demo Application ───────────────────────────────────────────────────────

/// Paints the attribute and color samples, quits on `q`.
struct DemoApp {
    image: CellBuffer,
}

impl DemoApp {
    fn new() -> Self {
        Self {
            image: CellBuffer::new(Size::new(0, 0)),
        }
    }

    fn repaint(&mut self) -> tl_term::Result<()> {
        let mut ctx = DrawingContext::new(&mut self.image);
        let title_len = i32::try_from(TITLE.len()).unwrap_or(i32::MAX);
        let width = i32::from(ctx.image().width());

        ctx.move_to((width - title_len).div_euclid(2), 0);
        ctx.print(TITLE)?;
        ctx.print(&"=".repeat(TITLE.len()))?;

        ctx.move_to(0, 3);
        ctx.set_fg_color(Color::BrightGreen);
        ctx.set_bg_color(Color::Red);
        ctx.print("Type 'q' to quit")?;
        ctx.reset_colors();

        ctx.move_to(10, 6);
        ctx.set_attribute(Attr::REVERSE);
        ctx.print("REVERSE")?;
        ctx.move_to(10, 7);
        ctx.set_attribute(Attr::UNDERLINE);
        ctx.print("UNDERLINE")?;
        ctx.move_to(10, 8);
        ctx.set_attribute(Attr::UNDERLINE | Attr::REVERSE);
        ctx.print("BOTH")?;
        Ok(())
    }
}

/// A failed repaint ends the run with the error as its exit value.
fn after_repaint<T>(painted: tl_term::Result<()>, image: T) -> Flow<T, tl_term::Error> {
    match painted {
        Ok(()) => Flow::Continue(image),
        Err(e) => {
            error!(%e, "repaint failed");
            Flow::Stop(Some(e))
        }
    }
}

impl Application for DemoApp {
    type Exit = tl_term::Error;

    fn consume_event(&mut self, event: Event) -> Flow<&CellBuffer, tl_term::Error> {
        match event {
            Event::Resize(size) => self.image = CellBuffer::new(size),
            Event::Keyboard(data) if data.key == Key::Char('q') => return Flow::Stop(None),
            _ => {}
        }
        let painted = self.repaint();
        after_repaint(painted, &self.image)
    }
}

// ─── Entry Point ────────────────────────────────────────────────────────────

fn setup_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// Backend requested through the environment, terminal if unset.
fn display_kind() -> tl_term::Result<DisplayKind> {
    env::var(DISPLAY_VAR).map_or_else(|_| Ok(DisplayKind::default()), |value| value.parse())
}

fn try_main() -> tl_term::Result<()> {
    let config = DisplayConfig::new(display_kind()?);
    info!(kind = %config.kind, "opening display");
    let mut display = open_display(&config)?;
    match run(display.as_mut(), &mut DemoApp::new())? {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn main() {
    setup_logging();

    if let Err(e) = try_main() {
        eprintln!("textland: {e}");
        process::exit(1);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
