// SPDX-License-Identifier: MIT
//
// tl-term: the textland display toolkit.
//
// An application keeps a grid of styled character cells (`CellBuffer`),
// paints into it through a cursor-and-clip painter (`DrawingContext`),
// and hands it to a `Display` backend. The run loop alternates between
// waiting for the next event and rendering whatever buffer the
// application returns, until one side asks to stop.
//
// Three backends share that loop: a raw-mode ANSI terminal, a plain
// line-based fallback that prints framed buffers to stdout, and a
// recording backend that replays scripted events for tests.

pub mod ansi;
pub mod buffer;
pub mod cell;
pub mod color;
pub mod display;
pub mod drawing;
pub mod error;
pub mod event;
pub mod geometry;
pub mod input;
pub mod output;
pub mod terminal;

pub use buffer::CellBuffer;
pub use cell::{Attr, Cell, Style};
pub use color::Color;
pub use display::{Application, Display, DisplayConfig, DisplayKind, Flow, open_display, run};
pub use drawing::DrawingContext;
pub use error::{Error, Result};
pub use event::{Event, Key, KeyboardData, MouseButton, MouseData};
pub use geometry::{Offset, Rect, Size};
