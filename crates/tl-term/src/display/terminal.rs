// SPDX-License-Identifier: MIT
//
// Real-terminal backend.
//
// Rendering writes every cell of the frame into one `OutputBuffer` and
// flushes it with a single write. The bottom-right cell is special: a
// character written there leaves the cursor past the last column, and
// many terminals scroll the screen when that happens. The bottom row is
// therefore written shifted one column left, then ICH (`ESC [ @`) opens a
// blank at column 0, pushing the row into place, and the first cell is
// written into the gap.
//
// Input is a blocking wait on stdin and the signal wakeup pipe. Ctrl-C
// ends the session without a value. A resize is reported before any
// buffered keys. A lone ESC waits `ESC_TIMEOUT_MS` for the rest of a
// sequence before it is delivered as a key.

use std::collections::VecDeque;
use std::io;

use tracing::{debug, trace};

use super::Display;
use crate::ansi;
use crate::buffer::CellBuffer;
use crate::color::{ColorPairs, Rendition};
use crate::error::{Error, Result};
use crate::event::{Event, Key};
use crate::geometry::Size;
use crate::input::KeyDecoder;
use crate::output::{CellWriter, OutputBuffer};
use crate::terminal::{self, ReadOutcome, Terminal};

/// Size assumed when the terminal does not report one.
const DEFAULT_SIZE: Size = Size::new(80, 24);

/// How long a lone ESC waits for the rest of an escape sequence.
const ESC_TIMEOUT_MS: i32 = 25;

const READ_CHUNK: usize = 256;

/// A display on the controlling terminal.
pub struct TerminalDisplay {
    term: Terminal,
    decoder: KeyDecoder,
    pending: VecDeque<Key>,
    pairs: ColorPairs,
    out: OutputBuffer,
}

impl TerminalDisplay {
    /// Open the terminal without touching its mode yet.
    ///
    /// # Errors
    ///
    /// [`Error::TerminalUnavailable`] when stdin or stdout is not a TTY.
    pub fn new() -> Result<Self> {
        if !terminal::is_tty() {
            return Err(Error::TerminalUnavailable(
                "stdin or stdout is not a terminal".to_owned(),
            ));
        }
        Ok(Self {
            term: Terminal::new(DEFAULT_SIZE),
            decoder: KeyDecoder::new(),
            pending: VecDeque::new(),
            pairs: ColorPairs::new(),
            out: OutputBuffer::new(),
        })
    }

    fn read_more(&mut self) -> Result<bool> {
        let mut buf = [0u8; READ_CHUNK];
        match self.term.read_input(&mut buf)? {
            ReadOutcome::Data(n) => {
                let keys = self.decoder.advance(&buf[..n]);
                trace!(bytes = n, keys = keys.len(), "terminal input");
                self.pending.extend(keys);
                Ok(true)
            }
            ReadOutcome::Interrupted => Ok(true),
            ReadOutcome::Closed => Ok(false),
        }
    }
}

impl Display for TerminalDisplay {
    fn begin(&mut self) -> Result<()> {
        self.term.enter()?;
        self.pairs = ColorPairs::new();
        Ok(())
    }

    fn end(&mut self) -> Result<()> {
        self.term.leave()?;
        Ok(())
    }

    fn display_size(&self) -> Size {
        self.term.size()
    }

    fn wait_for_event(&mut self) -> Result<Option<Event>> {
        loop {
            if let Some(event) = signal_event(&mut self.term) {
                return Ok(event);
            }
            if let Some(key) = self.pending.pop_front() {
                return Ok(Some(Event::key(key)));
            }
            if self.decoder.has_pending() && !self.term.poll_readable(ESC_TIMEOUT_MS)? {
                self.pending.extend(self.decoder.flush());
                continue;
            }
            if !self.read_more()? {
                debug!("terminal input closed");
                return Ok(None);
            }
        }
    }

    fn display_image(&mut self, image: &CellBuffer) -> Result<()> {
        render_frame(&mut self.out, image, &self.pairs, self.term.size());
        self.out.flush_to(&mut io::stdout().lock())?;
        Ok(())
    }
}

/// Turn a pending signal into the result of a wait. Ctrl-C stops the
/// session, a resize becomes a `Resize` event.
fn signal_event(term: &mut Terminal) -> Option<Option<Event>> {
    if terminal::take_interrupt() {
        debug!("interrupted");
        return Some(None);
    }
    if terminal::take_resize() {
        let size = term.refresh_size();
        debug!(width = size.width, height = size.height, "terminal resized");
        return Some(Some(Event::Resize(size)));
    }
    None
}

/// Encode `image` for a screen of `screen` cells.
///
/// Only the part of the image that fits on the screen is drawn. When the
/// image reaches the bottom-right corner, the last row goes through the
/// insert-character path so the cursor never lands past the corner.
pub fn render_frame(out: &mut OutputBuffer, image: &CellBuffer, pairs: &ColorPairs, screen: Size) {
    let width = image.width().min(screen.width);
    let height = image.height().min(screen.height);
    if width == 0 || height == 0 {
        return;
    }

    let mut writer = CellWriter::new();
    let corner = width == screen.width && height == screen.height;
    let plain_rows = if corner { height - 1 } else { height };

    for y in 0..plain_rows {
        for x in 0..width {
            writer.render_cell(out, x, y, image.get(x, y), pairs);
        }
    }

    if corner {
        let y = height - 1;
        for x in 1..width {
            writer.render_cell(out, x - 1, y, image.get(x, y), pairs);
        }
        let first = image.get(0, y);
        let _ = ansi::cursor_to(out, 0, y);
        let _ = ansi::insert_chars(out, 1);
        writer.select(out, Rendition::of(first.style), pairs);
        out.write_char(first.ch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{Attr, Style};
    use crate::color::Color;
    use pretty_assertions::assert_eq;

    fn render(image: &CellBuffer, screen: Size) -> String {
        let mut out = OutputBuffer::new();
        render_frame(&mut out, image, &ColorPairs::new(), screen);
        String::from_utf8(out.as_bytes().to_vec()).unwrap()
    }

    fn text_buffer(rows: &[&str]) -> CellBuffer {
        let width = u16::try_from(rows[0].len()).unwrap();
        let height = u16::try_from(rows.len()).unwrap();
        let mut image = CellBuffer::new(Size::new(width, height));
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                let cell = crate::cell::Cell::new(ch, Style::TEXT);
                image.put_cell(u16::try_from(x).unwrap(), u16::try_from(y).unwrap(), cell);
            }
        }
        image
    }

    #[test]
    fn full_screen_frame_inserts_first_cell_of_last_row() {
        let image = text_buffer(&["ab", "cd"]);
        assert_eq!(
            render(&image, Size::new(2, 2)),
            "\x1b[1;1H\x1b[0;39;49mab\x1b[2;1Hd\x1b[2;1H\x1b[@c"
        );
    }

    #[test]
    fn single_cell_screen() {
        let image = text_buffer(&["z"]);
        assert_eq!(render(&image, Size::new(1, 1)), "\x1b[1;1H\x1b[@\x1b[0;39;49mz");
    }

    #[test]
    fn image_smaller_than_screen_is_written_plainly() {
        let image = text_buffer(&["ab", "cd"]);
        assert_eq!(
            render(&image, Size::new(5, 5)),
            "\x1b[1;1H\x1b[0;39;49mab\x1b[2;1Hcd"
        );
    }

    #[test]
    fn image_larger_than_screen_is_cropped() {
        let image = text_buffer(&["abc", "def", "ghi"]);
        assert_eq!(
            render(&image, Size::new(2, 1)),
            "\x1b[1;1H\x1b[0;39;49mb\x1b[1;1H\x1b[@a"
        );
    }

    #[test]
    fn first_cell_style_is_selected_after_insert() {
        let mut image = text_buffer(&["ab"]);
        image.put(0, 0, 'a', Attr::REVERSE, Color::Red, Color::Black);
        assert_eq!(
            render(&image, Size::new(2, 1)),
            "\x1b[1;1H\x1b[0;39;49mb\x1b[1;1H\x1b[@\x1b[0;7;31;40ma"
        );
    }

    #[test]
    fn interrupt_stops_without_value_once() {
        let mut term = Terminal::new(Size::new(77, 22));
        terminal::note_interrupt();
        assert_eq!(signal_event(&mut term), Some(None));
        assert!(!terminal::take_interrupt(), "interrupt must be consumed");
    }

    #[test]
    fn empty_image_renders_nothing() {
        let image = CellBuffer::new(Size::new(0, 0));
        assert_eq!(render(&image, Size::new(80, 24)), "");
    }
}
