// SPDX-License-Identifier: MIT
//
// Output buffering and stateful cell rendering.
//
// Two components work together so a frame reaches the terminal in one
// write:
//
//   OutputBuffer: accumulates all ANSI bytes in memory so the entire frame
//   is written with a single write() call.
//
//   CellWriter: remembers the cursor position and the rendition last
//   selected, and skips the escape sequences that would not change
//   anything. Consecutive cells in one style cost one byte each.

use std::io::{self, Write};

use crate::ansi;
use crate::cell::Cell;
use crate::color::{ColorPairs, Rendition};

// ─── OutputBuffer ────────────────────────────────────────────────────────────

/// A byte buffer that accumulates a frame's ANSI output.
pub struct OutputBuffer {
    buf: Vec<u8>,
}

const DEFAULT_CAPACITY: usize = 16_384;

impl OutputBuffer {
    /// Create an empty buffer with default capacity (16 KB).
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(DEFAULT_CAPACITY),
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The accumulated bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Append a character as UTF-8.
    #[inline]
    pub fn write_char(&mut self, ch: char) {
        let mut enc = [0u8; 4];
        self.buf.extend_from_slice(ch.encode_utf8(&mut enc).as_bytes());
    }

    /// Write accumulated output to `w`, flush it, and clear the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        if !self.buf.is_empty() {
            w.write_all(&self.buf)?;
            w.flush()?;
            self.buf.clear();
        }
        Ok(())
    }
}

impl Write for OutputBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // Real flushing happens in flush_to().
        Ok(())
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── CellWriter ──────────────────────────────────────────────────────────────

/// Stateful cell renderer that skips redundant cursor moves and renditions.
///
/// - **Cursor**: skipped when the next cell is at `(last_x + 1, last_y)`,
///   since the terminal advances after each character.
/// - **Rendition**: skipped when it equals the one selected last.
pub struct CellWriter {
    last_x: i32,
    last_y: i32,
    last: Option<Rendition>,
}

impl CellWriter {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last_x: -1,
            last_y: -1,
            last: None,
        }
    }

    /// Render `cell` at screen position `(x, y)`.
    pub fn render_cell(
        &mut self,
        out: &mut OutputBuffer,
        x: u16,
        y: u16,
        cell: Cell,
        pairs: &ColorPairs,
    ) {
        let xi = i32::from(x);
        let yi = i32::from(y);

        // Writes into a Vec-backed buffer cannot fail.
        if yi != self.last_y || xi != self.last_x + 1 {
            let _ = ansi::cursor_to(out, x, y);
        }
        self.select(out, Rendition::of(cell.style), pairs);
        out.write_char(cell.ch);

        self.last_x = xi;
        self.last_y = yi;
    }

    /// Select `r` unless it is already active.
    pub fn select(&mut self, out: &mut OutputBuffer, r: Rendition, pairs: &ColorPairs) {
        if self.last != Some(r) {
            let _ = ansi::rendition(out, r, pairs);
            self.last = Some(r);
        }
    }
}

impl Default for CellWriter {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
