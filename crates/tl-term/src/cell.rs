// SPDX-License-Identifier: MIT
//
// Cell: one character position and its style.
//
// A style is three small fields: video attributes, a foreground palette
// index, and a background palette index. Internally they are kept as a
// structured record; the packed 16-bit word is the exchange format and is
// reproducible bit-for-bit from any style:
//
//   ┌──────────┬──────────┬──────────┬──────────┐
//   │ 15..12   │ 11..8    │ 7..4     │ 3..0     │
//   │ reserved │ attr     │ fg index │ bg index │
//   └──────────┴──────────┴──────────┴──────────┘
//
// Attribute bits: REVERSE = 0x1, UNDERLINE = 0x2, combinable. NORMAL is 0.

use crate::color::Color;

// ─── Video Attributes ───────────────────────────────────────────────────────

bitflags::bitflags! {
    /// Video attributes, combinable with bitwise OR.
    ///
    /// ```
    /// use tl_term::cell::Attr;
    ///
    /// let both = Attr::UNDERLINE | Attr::REVERSE;
    /// assert!(both.contains(Attr::REVERSE));
    /// assert_eq!(both.bits(), 0x3);
    /// assert_eq!(Attr::NORMAL.bits(), 0);
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Attr: u8 {
        /// Swap foreground and background.
        const REVERSE   = 0x1;
        /// Underline the character.
        const UNDERLINE = 0x2;
    }
}

impl Attr {
    /// No attributes.
    pub const NORMAL: Self = Self::empty();
}

// ─── Style ──────────────────────────────────────────────────────────────────

/// Attributes plus foreground and background colors of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Style {
    pub attr: Attr,
    pub fg: Color,
    pub bg: Color,
}

impl Style {
    /// The style of a freshly allocated cell: packs to `0`.
    pub const DEFAULT: Self = Self {
        attr: Attr::NORMAL,
        fg: Color::Black,
        bg: Color::Black,
    };

    /// Plain text: white on black, no attributes.
    pub const TEXT: Self = Self {
        attr: Attr::NORMAL,
        fg: Color::White,
        bg: Color::Black,
    };

    #[inline]
    #[must_use]
    pub const fn new(attr: Attr, fg: Color, bg: Color) -> Self {
        Self { attr, fg, bg }
    }

    /// Encode as the packed `attr(4) | fg(4) | bg(4)` word.
    #[inline]
    #[must_use]
    pub const fn pack(self) -> u16 {
        ((self.attr.bits() as u16 & 0xF) << 8) | ((self.fg.index() as u16) << 4) | self.bg.index() as u16
    }

    /// Decode a packed word. Reserved high bits are ignored.
    #[inline]
    #[must_use]
    pub const fn unpack(word: u16) -> Self {
        #[allow(clippy::cast_possible_truncation)] // masked to 4 bits
        let attr = Attr::from_bits_truncate(((word >> 8) & 0xF) as u8);
        Self {
            attr,
            fg: Color::from_nibble(word >> 4),
            bg: Color::from_nibble(word),
        }
    }
}

// ─── Cell ───────────────────────────────────────────────────────────────────

/// A single grid position: a character and its style.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub ch: char,
    pub style: Style,
}

impl Cell {
    /// A blank cell: space, default style.
    pub const EMPTY: Self = Self {
        ch: ' ',
        style: Style::DEFAULT,
    };

    #[inline]
    #[must_use]
    pub const fn new(ch: char, style: Style) -> Self {
        Self { ch, style }
    }

    /// The packed style word (see the module docs for the layout).
    #[inline]
    #[must_use]
    pub const fn attributes(self) -> u16 {
        self.style.pack()
    }

    #[inline]
    #[must_use]
    pub const fn attr(self) -> Attr {
        self.style.attr
    }

    #[inline]
    #[must_use]
    pub const fn fg(self) -> Color {
        self.style.fg
    }

    #[inline]
    #[must_use]
    pub const fn bg(self) -> Color {
        self.style.bg
    }
}

impl Default for Cell {
    #[inline]
    fn default() -> Self {
        Self::EMPTY
    }
}

impl std::fmt::Debug for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Cell({:?}", self.ch)?;
        if self.style != Style::DEFAULT {
            write!(f, ", {:?} on {:?}", self.style.fg, self.style.bg)?;
            if !self.style.attr.is_empty() {
                write!(f, ", {:?}", self.style.attr)?;
            }
        }
        write!(f, ")")
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
