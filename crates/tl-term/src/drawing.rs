// SPDX-License-Identifier: MIT
//
// DrawingContext: a cursor-and-clip painter over one borrowed buffer.
//
// The context carries three pieces of state on top of the buffer:
//
//   - an offset, the position the next `print` starts at;
//   - a clip rectangle, outside of which nothing is written;
//   - a style (attributes, foreground, background) applied to every write.
//
// Offset and clip are in absolute buffer coordinates and are never
// validated: an offset can sit left of column 0, a clip can be empty or
// hang off the buffer. Every write is filtered through `clip ∩ buffer`, so
// painting out of range is silently dropped rather than faulting.
//
// Line handling in `print` keeps the column: each line starts at the same
// x as the first one and only y advances. Callers that want a left margin
// of 0 move there themselves.

use crate::buffer::CellBuffer;
use crate::cell::{Attr, Cell, Style};
use crate::color::Color;
use crate::error::{Error, Result};
use crate::geometry::{Offset, Rect};

/// Stateful painter over a [`CellBuffer`].
///
/// Create one per paint pass; it borrows the buffer mutably until dropped.
///
/// # Examples
///
/// ```
/// use tl_term::{CellBuffer, DrawingContext, Size};
///
/// let mut image = CellBuffer::new(Size::new(10, 3));
/// let mut ctx = DrawingContext::new(&mut image);
/// ctx.move_to(2, 0);
/// ctx.print("A\nB")?;
/// drop(ctx);
///
/// assert_eq!(image.get(2, 0).ch, 'A');
/// assert_eq!(image.get(2, 1).ch, 'B');
/// # Ok::<(), tl_term::Error>(())
/// ```
pub struct DrawingContext<'a> {
    image: &'a mut CellBuffer,
    offset: Offset,
    clip: Rect,
    style: Style,
}

impl<'a> DrawingContext<'a> {
    /// Start painting at `(0, 0)` with the clip covering the whole buffer
    /// and plain white-on-black text.
    pub fn new(image: &'a mut CellBuffer) -> Self {
        let clip = image.bounds();
        Self {
            image,
            offset: Offset::default(),
            clip,
            style: Style::TEXT,
        }
    }

    // ─── State ──────────────────────────────────────────────────────────

    #[inline]
    #[must_use]
    pub const fn offset(&self) -> Offset {
        self.offset
    }

    #[inline]
    #[must_use]
    pub const fn clip(&self) -> Rect {
        self.clip
    }

    #[inline]
    #[must_use]
    pub const fn style(&self) -> Style {
        self.style
    }

    /// The buffer being painted.
    #[inline]
    #[must_use]
    pub fn image(&self) -> &CellBuffer {
        &*self.image
    }

    // ─── Offset ─────────────────────────────────────────────────────────

    /// Move the paint offset to `(x, y)`.
    pub const fn move_to(&mut self, x: i32, y: i32) {
        self.offset = Offset::new(x, y);
    }

    /// Move the paint offset by `(dx, dy)`.
    pub const fn move_by(&mut self, dx: i32, dy: i32) {
        self.offset = self.offset.translated(dx, dy);
    }

    // ─── Clip ───────────────────────────────────────────────────────────

    /// Replace the clip rectangle.
    ///
    /// No validation: an empty or off-buffer clip suppresses writes.
    pub const fn clip_to(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        self.clip = Rect::new(x1, y1, x2, y2);
    }

    /// Move each edge of the clip rectangle by its own delta.
    pub const fn clip_by(&mut self, dx1: i32, dy1: i32, dx2: i32, dy2: i32) {
        self.clip = self.clip.shifted_by(dx1, dy1, dx2, dy2);
    }

    // ─── Style ──────────────────────────────────────────────────────────

    pub const fn set_fg_color(&mut self, fg: Color) {
        self.style.fg = fg;
    }

    pub const fn set_bg_color(&mut self, bg: Color) {
        self.style.bg = bg;
    }

    /// Set the video attributes for subsequent writes.
    ///
    /// Replaces the previous attributes; combine flags with `|` to get
    /// more than one.
    pub const fn set_attribute(&mut self, attr: Attr) {
        self.style.attr = attr;
    }

    /// Back to white on black. Attributes are kept.
    pub const fn reset_colors(&mut self) {
        self.style.fg = Style::TEXT.fg;
        self.style.bg = Style::TEXT.bg;
    }

    // ─── Painting ───────────────────────────────────────────────────────

    /// Write `ch` to every cell inside the clip that is also inside the
    /// buffer.
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    pub fn fill(&mut self, ch: char) {
        let area = self.clip.intersect(self.image.bounds());
        if area.is_empty() {
            return;
        }
        let cell = Cell::new(ch, self.style);
        // Intersection with the buffer bounds keeps every edge in 0..=u16::MAX.
        for y in area.y1..area.y2 {
            for x in area.x1..area.x2 {
                self.image.put_cell(x as u16, y as u16, cell);
            }
        }
    }

    /// Print `text` at the offset.
    ///
    /// Each line is painted starting at the current offset, then the offset
    /// moves down one row (x unchanged). Characters outside the clip or the
    /// buffer are skipped. `\r\n` and every character in [`LINE_BREAKS`]
    /// end a line; a trailing line break does not start an extra line,
    /// and an empty string paints nothing and leaves the offset alone.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if a line still holds a newline after
    /// splitting. Splitting removes them all, so this is never expected.
    pub fn print(&mut self, text: &str) -> Result<()> {
        for line in split_lines(text) {
            self.put_line(line)?;
            self.move_by(0, 1);
        }
        Ok(())
    }

    /// Paint one line at the offset, honoring the clip.
    fn put_line(&mut self, line: &str) -> Result<()> {
        if line.contains('\n') {
            return Err(Error::InvalidArgument(format!(
                "line segment {line:?} contains a newline"
            )));
        }
        let mut x = self.offset.x;
        for ch in line.chars() {
            self.put_at(x, self.offset.y, ch);
            x = x.saturating_add(1);
        }
        Ok(())
    }

    /// Write one character at absolute `(x, y)` if it survives clipping.
    fn put_at(&mut self, x: i32, y: i32, ch: char) {
        if !self.clip.contains(x, y) {
            return;
        }
        let (Ok(cx), Ok(cy)) = (u16::try_from(x), u16::try_from(y)) else {
            return;
        };
        if self.image.in_bounds(cx, cy) {
            self.image.put_cell(cx, cy, Cell::new(ch, self.style));
        }
    }
}

/// Characters that end a line in [`DrawingContext::print`]: LF, VT, FF,
/// CR, the ASCII file/group/record separators, NEL, and the Unicode line
/// and paragraph separators. `\r\n` counts as one break.
pub const LINE_BREAKS: [char; 10] = [
    '\n', '\x0b', '\x0c', '\r', '\x1c', '\x1d', '\x1e', '\u{85}', '\u{2028}', '\u{2029}',
];

/// Split on [`LINE_BREAKS`] and `\r\n`, without a trailing empty line.
fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        match rest.find(LINE_BREAKS) {
            Some(pos) => {
                let line = &rest[..pos];
                let tail = &rest[pos..];
                let skip = if tail.starts_with("\r\n") {
                    2
                } else {
                    tail.chars().next().map_or(1, char::len_utf8)
                };
                rest = &rest[pos + skip..];
                Some(line)
            }
            None => {
                let line = rest;
                rest = "";
                Some(line)
            }
        }
    })
}

// ─── Tests ──────────────────────────────────────────────────────────────────
