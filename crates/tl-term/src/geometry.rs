// SPDX-License-Identifier: MIT
//
// Geometry: sizes, paint offsets, and clip rectangles.
//
// Sizes are unsigned (a buffer never has negative extent). Offsets and
// rectangles are signed and unbounded: a painter may sit at (-3, 40) on a
// 10×5 buffer, and a clip may hang off every edge. Nothing here clamps.
// Clipping is a filter applied at write time, never a correction of the
// coordinates themselves.

// ─── Size ───────────────────────────────────────────────────────────────────

/// Dimensions of a buffer or display in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    /// Number of columns.
    pub width: u16,
    /// Number of rows.
    pub height: u16,
}

impl Size {
    #[inline]
    #[must_use]
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Total number of cells (`width × height`).
    #[inline]
    #[must_use]
    pub const fn area(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Whether either dimension is zero.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

// ─── Offset ─────────────────────────────────────────────────────────────────

/// A paint position in absolute buffer coordinates.
///
/// May be negative or beyond the buffer; writes are filtered by the clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Offset {
    pub x: i32,
    pub y: i32,
}

impl Offset {
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// This offset moved by `(dx, dy)`.
    #[inline]
    #[must_use]
    pub const fn translated(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

// ─── Rect ───────────────────────────────────────────────────────────────────

/// A half-open rectangle: `x1..x2` columns, `y1..y2` rows.
///
/// `(x1, y1)` is inclusive, `(x2, y2)` exclusive. A rectangle with
/// `x2 <= x1` or `y2 <= y1` is empty and contains nothing.
///
/// # Examples
///
/// ```
/// use tl_term::geometry::Rect;
///
/// let clip = Rect::new(2, 1, 6, 4);
/// assert!(clip.contains(2, 1));   // top-left: inside
/// assert!(clip.contains(5, 3));   // last column / row: inside
/// assert!(!clip.contains(6, 3));  // right edge is exclusive
/// assert!(!clip.contains(5, 4));  // bottom edge is exclusive
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Rect {
    #[inline]
    #[must_use]
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// The rectangle covering a whole buffer of `size`.
    #[inline]
    #[must_use]
    pub fn from_size(size: Size) -> Self {
        Self::new(0, 0, i32::from(size.width), i32::from(size.height))
    }

    /// Columns covered (zero when empty).
    #[inline]
    #[must_use]
    pub const fn width(self) -> i32 {
        if self.x2 > self.x1 { self.x2 - self.x1 } else { 0 }
    }

    /// Rows covered (zero when empty).
    #[inline]
    #[must_use]
    pub const fn height(self) -> i32 {
        if self.y2 > self.y1 { self.y2 - self.y1 } else { 0 }
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.x2 <= self.x1 || self.y2 <= self.y1
    }

    /// Whether `(x, y)` lies inside the rectangle.
    #[inline]
    #[must_use]
    pub const fn contains(self, x: i32, y: i32) -> bool {
        self.x1 <= x && x < self.x2 && self.y1 <= y && y < self.y2
    }

    /// The overlap of two rectangles.
    ///
    /// Always returns a rectangle; if they do not overlap the result is
    /// empty (check with [`is_empty`](Self::is_empty)).
    #[must_use]
    pub fn intersect(self, other: Self) -> Self {
        Self {
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
            x2: self.x2.min(other.x2),
            y2: self.y2.min(other.y2),
        }
    }

    /// Each edge moved independently by its own delta.
    #[inline]
    #[must_use]
    pub const fn shifted_by(self, dx1: i32, dy1: i32, dx2: i32, dy2: i32) -> Self {
        Self {
            x1: self.x1 + dx1,
            y1: self.y1 + dy1,
            x2: self.x2 + dx2,
            y2: self.y2 + dy2,
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ── Size ────────────────────────────────────────────────────────────

    #[test]
    fn size_area() {
        assert_eq!(Size::new(80, 25).area(), 2000);
        assert_eq!(Size::new(0, 25).area(), 0);
    }

    #[test]
    fn size_empty() {
        assert!(Size::new(0, 5).is_empty());
        assert!(Size::new(5, 0).is_empty());
        assert!(!Size::new(1, 1).is_empty());
        assert!(Size::default().is_empty());
    }

    // ── Offset ──────────────────────────────────────────────────────────

    #[test]
    fn offset_translation_composes() {
        let o = Offset::new(1, 1).translated(1, 0).translated(2, 0);
        assert_eq!(o, Offset::new(4, 1));
    }

    #[test]
    fn offset_may_go_negative() {
        let o = Offset::default().translated(-5, -1);
        assert_eq!(o, Offset::new(-5, -1));
    }

    // ── Rect ────────────────────────────────────────────────────────────

    #[test]
    fn rect_from_size_covers_buffer() {
        assert_eq!(Rect::from_size(Size::new(10, 5)), Rect::new(0, 0, 10, 5));
    }

    #[test]
    fn rect_edges_are_half_open() {
        let r = Rect::new(0, 0, 3, 2);
        assert!(r.contains(0, 0));
        assert!(r.contains(2, 1));
        assert!(!r.contains(3, 0));
        assert!(!r.contains(0, 2));
        assert!(!r.contains(-1, 0));
    }

    #[test]
    fn rect_inverted_is_empty() {
        let r = Rect::new(5, 5, 2, 8);
        assert!(r.is_empty());
        assert_eq!(r.width(), 0);
        assert!(!r.contains(3, 6));
    }

    #[test]
    fn rect_intersection() {
        let a = Rect::new(-2, -2, 4, 4);
        let b = Rect::new(0, 0, 10, 5);
        assert_eq!(a.intersect(b), Rect::new(0, 0, 4, 4));
    }

    #[test]
    fn rect_disjoint_intersection_is_empty() {
        let a = Rect::new(0, 0, 2, 2);
        let b = Rect::new(2, 0, 4, 2);
        assert!(a.intersect(b).is_empty());
    }

    #[test]
    fn rect_shift_moves_each_edge() {
        let r = Rect::new(0, 0, 10, 5).shifted_by(1, 2, -1, -2);
        assert_eq!(r, Rect::new(1, 2, 9, 3));
        assert_eq!(r.width(), 8);
        assert_eq!(r.height(), 1);
    }
}
