// SPDX-License-Identifier: MIT
//
// CellBuffer: the fixed-size grid an application paints and a display
// renders.
//
// Design:
//
//   - Flat `Vec<Cell>` in row-major order: `index = x + y * width`. Rows
//     are contiguous, so rendering a line is a linear scan.
//
//   - The size is fixed at construction. A resize means building a new
//     buffer and dropping the old one; there is no in-place resize.
//
//   - `put` and `get` do not clip. Every coordinate must satisfy
//     `0 <= x < width` and `0 <= y < height`; anything else is a caller bug
//     and panics. Clipped painting lives one layer up, in `DrawingContext`.

use crate::cell::{Attr, Cell, Style};
use crate::color::Color;
use crate::geometry::{Rect, Size};

/// A rectangular grid of styled character cells.
///
/// # Examples
///
/// ```
/// use tl_term::{Attr, CellBuffer, Color, Size};
///
/// let mut buf = CellBuffer::new(Size::new(10, 5));
/// buf.put(3, 1, 'x', Attr::UNDERLINE, Color::Red, Color::Black);
///
/// let cell = buf.get(3, 1);
/// assert_eq!(cell.ch, 'x');
/// assert_eq!(cell.attributes(), 0x0210);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct CellBuffer {
    size: Size,
    cells: Vec<Cell>,
}

impl CellBuffer {
    /// Allocate `width × height` blank cells (space, default style).
    #[must_use]
    pub fn new(size: Size) -> Self {
        Self {
            size,
            cells: vec![Cell::EMPTY; size.area()],
        }
    }

    // ─── Accessors ──────────────────────────────────────────────────────

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.size.width
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.size.height
    }

    /// The whole buffer as a rectangle, for clip intersection.
    #[inline]
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.size)
    }

    /// Whether `(x, y)` addresses a cell of this buffer.
    #[inline]
    #[must_use]
    pub const fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.size.width && y < self.size.height
    }

    /// All cells in row-major order.
    #[inline]
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Flat index of `(x, y)`. Panics when out of bounds.
    #[inline]
    #[track_caller]
    fn index(&self, x: u16, y: u16) -> usize {
        assert!(
            self.in_bounds(x, y),
            "cell ({x}, {y}) out of bounds for {}x{} buffer",
            self.size.width,
            self.size.height
        );
        usize::from(x) + usize::from(y) * usize::from(self.size.width)
    }

    // ─── Cell Access ────────────────────────────────────────────────────

    /// Read the cell at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the buffer.
    #[inline]
    #[must_use]
    #[track_caller]
    pub fn get(&self, x: u16, y: u16) -> Cell {
        self.cells[self.index(x, y)]
    }

    /// Write a character with the given attributes and colors at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the buffer.
    #[inline]
    #[track_caller]
    pub fn put(&mut self, x: u16, y: u16, ch: char, attr: Attr, fg: Color, bg: Color) {
        self.put_cell(x, y, Cell::new(ch, Style::new(attr, fg, bg)));
    }

    /// Write a whole cell at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the buffer.
    #[inline]
    #[track_caller]
    pub fn put_cell(&mut self, x: u16, y: u16, cell: Cell) {
        let idx = self.index(x, y);
        self.cells[idx] = cell;
    }

    /// A single row as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `y` is outside the buffer.
    #[must_use]
    #[track_caller]
    pub fn row(&self, y: u16) -> &[Cell] {
        assert!(
            y < self.size.height,
            "row {y} out of bounds for {}x{} buffer",
            self.size.width,
            self.size.height
        );
        let start = usize::from(y) * usize::from(self.size.width);
        &self.cells[start..start + usize::from(self.size.width)]
    }

    /// The characters of row `y` as a string, styles dropped.
    ///
    /// # Panics
    ///
    /// Panics if `y` is outside the buffer.
    #[must_use]
    #[track_caller]
    pub fn row_text(&self, y: u16) -> String {
        self.row(y).iter().map(|cell| cell.ch).collect()
    }
}

impl std::fmt::Debug for CellBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CellBuffer({}x{})", self.size.width, self.size.height)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ── Construction ────────────────────────────────────────────────────

    #[test]
    fn new_buffer_is_blank() {
        let buf = CellBuffer::new(Size::new(4, 3));
        assert_eq!(buf.size(), Size::new(4, 3));
        assert_eq!(buf.cells().len(), 12);
        assert!(buf.cells().iter().all(|c| *c == Cell::EMPTY));
    }

    #[test]
    fn zero_sized_buffer() {
        let buf = CellBuffer::new(Size::new(0, 0));
        assert!(buf.cells().is_empty());
        assert!(!buf.in_bounds(0, 0));
    }

    #[test]
    fn bounds_cover_whole_grid() {
        let buf = CellBuffer::new(Size::new(7, 2));
        assert_eq!(buf.bounds(), Rect::new(0, 0, 7, 2));
    }

    // ── Put / Get ───────────────────────────────────────────────────────

    #[test]
    fn put_then_get_returns_char_and_packed_style() {
        let mut buf = CellBuffer::new(Size::new(10, 5));
        buf.put(9, 4, 'q', Attr::REVERSE | Attr::UNDERLINE, Color::BrightWhite, Color::Blue);
        let cell = buf.get(9, 4);
        assert_eq!(cell.ch, 'q');
        assert_eq!(cell.attributes(), 0x03F4);
    }

    #[test]
    fn put_every_cell_round_trips() {
        let mut buf = CellBuffer::new(Size::new(5, 3));
        for y in 0..3 {
            for x in 0..5 {
                let fg = Color::from_index(u8::try_from(x + y).unwrap()).unwrap();
                buf.put(x, y, 'o', Attr::NORMAL, fg, Color::Black);
            }
        }
        for y in 0..3 {
            for x in 0..5 {
                let cell = buf.get(x, y);
                assert_eq!(cell.ch, 'o');
                assert_eq!(cell.fg().index(), u8::try_from(x + y).unwrap());
            }
        }
    }

    #[test]
    fn layout_is_row_major() {
        let mut buf = CellBuffer::new(Size::new(3, 2));
        buf.put_cell(1, 1, Cell::new('z', Style::TEXT));
        assert_eq!(buf.cells()[1 + 3].ch, 'z');
    }

    #[test]
    fn put_leaves_other_cells_alone() {
        let mut buf = CellBuffer::new(Size::new(3, 3));
        buf.put(1, 1, '#', Attr::NORMAL, Color::White, Color::Black);
        let changed = buf.cells().iter().filter(|c| **c != Cell::EMPTY).count();
        assert_eq!(changed, 1);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn put_past_right_edge_panics() {
        let mut buf = CellBuffer::new(Size::new(3, 3));
        buf.put(3, 0, 'x', Attr::NORMAL, Color::White, Color::Black);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn get_past_bottom_edge_panics() {
        let buf = CellBuffer::new(Size::new(3, 3));
        let _ = buf.get(0, 3);
    }

    // ── Rows ────────────────────────────────────────────────────────────

    #[test]
    fn row_text_reads_characters() {
        let mut buf = CellBuffer::new(Size::new(4, 2));
        buf.put(0, 1, 'a', Attr::NORMAL, Color::White, Color::Black);
        buf.put(3, 1, 'b', Attr::NORMAL, Color::White, Color::Black);
        assert_eq!(buf.row_text(0), "    ");
        assert_eq!(buf.row_text(1), "a  b");
    }

    #[test]
    fn clone_is_deep() {
        let mut buf = CellBuffer::new(Size::new(2, 1));
        let snapshot = buf.clone();
        buf.put(0, 0, 'x', Attr::NORMAL, Color::White, Color::Black);
        assert_eq!(snapshot.get(0, 0), Cell::EMPTY);
        assert_ne!(snapshot, buf);
    }

    #[test]
    fn debug_shows_dimensions() {
        let buf = CellBuffer::new(Size::new(80, 25));
        assert_eq!(format!("{buf:?}"), "CellBuffer(80x25)");
    }
}
