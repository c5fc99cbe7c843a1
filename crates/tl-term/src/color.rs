// SPDX-License-Identifier: MIT
//
// Color: the 16-entry ANSI palette and the terminal color-pair scheme.
//
// Cells name colors by palette index only. Indices 0–7 are the ANSI base
// colors; 8–15 are their bright variants. There is no RGB, no 256-color
// cube, no "default" sentinel: a fixed small palette is the whole model.
//
// Color pairs:
//
//   The terminal backend renders a foreground/background combination by
//   selecting a numbered pair slot, the way character-cell libraries do.
//   The slot for a (fg, bg) base combination is
//
//       index = bg * 8 + 7 - fg
//
//   which makes white-on-black land on slot 0, the slot terminals reserve
//   for their own default colors. Bright foregrounds reuse their base slot
//   plus the bold attribute. Bright backgrounds degrade to their base
//   color: terminal support for them is too spotty to rely on.

use crate::cell::{Attr, Style};

// ─── Color ──────────────────────────────────────────────────────────────────

/// One of the 16 palette colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[repr(u8)]
pub enum Color {
    #[default]
    Black = 0,
    Red = 1,
    Green = 2,
    Yellow = 3,
    Blue = 4,
    Magenta = 5,
    Cyan = 6,
    White = 7,
    BrightBlack = 8,
    BrightRed = 9,
    BrightGreen = 10,
    BrightYellow = 11,
    BrightBlue = 12,
    BrightMagenta = 13,
    BrightCyan = 14,
    BrightWhite = 15,
}

/// Palette in index order, for index → color lookups.
const PALETTE: [Color; 16] = [
    Color::Black,
    Color::Red,
    Color::Green,
    Color::Yellow,
    Color::Blue,
    Color::Magenta,
    Color::Cyan,
    Color::White,
    Color::BrightBlack,
    Color::BrightRed,
    Color::BrightGreen,
    Color::BrightYellow,
    Color::BrightBlue,
    Color::BrightMagenta,
    Color::BrightCyan,
    Color::BrightWhite,
];

impl Color {
    /// Palette index, `0..16`.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// The color at `index`, or `None` if `index >= 16`.
    #[inline]
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        if index < 16 {
            Some(PALETTE[index as usize])
        } else {
            None
        }
    }

    /// The color named by the low 4 bits of `nibble`.
    #[inline]
    #[must_use]
    pub(crate) const fn from_nibble(nibble: u16) -> Self {
        PALETTE[(nibble & 0xF) as usize]
    }

    /// Whether this is one of the bright variants (index 8–15).
    #[inline]
    #[must_use]
    pub const fn is_bright(self) -> bool {
        self.index() >= 8
    }

    /// The non-bright color this one is a variant of.
    ///
    /// ```
    /// use tl_term::color::Color;
    ///
    /// assert_eq!(Color::BrightGreen.base(), Color::Green);
    /// assert_eq!(Color::Red.base(), Color::Red);
    /// ```
    #[inline]
    #[must_use]
    pub const fn base(self) -> Self {
        PALETTE[(self.index() & 0x7) as usize]
    }
}

// ─── Color Pairs ────────────────────────────────────────────────────────────

/// Number of pair slots: one per (fg, bg) combination of base colors.
pub const PAIR_COUNT: usize = 64;

/// Pair slot for a foreground/background combination.
///
/// Only the base colors take part; bright variants map to their base.
///
/// ```
/// use tl_term::color::{pair_index, Color};
///
/// assert_eq!(pair_index(Color::White, Color::Black), 0);
/// assert_eq!(pair_index(Color::Black, Color::Black), 7);
/// assert_eq!(pair_index(Color::Black, Color::Red), 15);
/// ```
#[inline]
#[must_use]
pub const fn pair_index(fg: Color, bg: Color) -> u8 {
    bg.base().index() * 8 + 7 - fg.base().index()
}

/// The table of color pairs a terminal session renders with.
///
/// Slot `pair_index(fg, bg)` holds `(fg, bg)` for every base combination
/// except white on black, which is slot 0 and renders with the terminal's
/// own default colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorPairs {
    slots: [Option<(Color, Color)>; PAIR_COUNT],
}

impl ColorPairs {
    /// Build the full pair table.
    #[must_use]
    pub fn new() -> Self {
        let mut slots = [None; PAIR_COUNT];
        for fg in &PALETTE[..8] {
            for bg in &PALETTE[..8] {
                if (*fg, *bg) == (Color::White, Color::Black) {
                    continue;
                }
                slots[usize::from(pair_index(*fg, *bg))] = Some((*fg, *bg));
            }
        }
        Self { slots }
    }

    /// The colors registered at `pair`, or `None` for the default pair.
    #[inline]
    #[must_use]
    pub fn get(&self, pair: u8) -> Option<(Color, Color)> {
        self.slots.get(usize::from(pair)).copied().flatten()
    }
}

impl Default for ColorPairs {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Rendition ──────────────────────────────────────────────────────────────

/// How a cell style is realized on a color-pair terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rendition {
    /// Color pair slot.
    pub pair: u8,
    /// Bold stands in for a bright foreground.
    pub bold: bool,
    /// Video attributes carried over from the style.
    pub attr: Attr,
}

impl Rendition {
    /// Translate a cell style into pair, bold flag, and attributes.
    #[must_use]
    pub const fn of(style: Style) -> Self {
        Self {
            pair: pair_index(style.fg, style.bg),
            bold: style.fg.is_bright(),
            attr: style.attr,
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ── Palette ─────────────────────────────────────────────────────────

    #[test]
    fn indices_follow_ansi_order() {
        assert_eq!(Color::Black.index(), 0);
        assert_eq!(Color::White.index(), 7);
        assert_eq!(Color::BrightBlack.index(), 8);
        assert_eq!(Color::BrightWhite.index(), 15);
    }

    #[test]
    fn from_index_round_trips_whole_palette() {
        for i in 0..16 {
            assert_eq!(Color::from_index(i).map(Color::index), Some(i));
        }
        assert_eq!(Color::from_index(16), None);
    }

    #[test]
    fn brightness() {
        assert!(!Color::White.is_bright());
        assert!(Color::BrightBlack.is_bright());
        assert_eq!(Color::BrightWhite.base(), Color::White);
        assert_eq!(Color::BrightBlack.base(), Color::Black);
    }

    // ── Pair formula ────────────────────────────────────────────────────

    #[test]
    fn pair_index_formula() {
        assert_eq!(pair_index(Color::White, Color::Black), 0);
        assert_eq!(pair_index(Color::Black, Color::Black), 7);
        assert_eq!(pair_index(Color::Black, Color::Red), 15);
        assert_eq!(pair_index(Color::Black, Color::White), 63);
    }

    #[test]
    fn pair_index_is_unique_per_base_combination() {
        let mut seen = [false; PAIR_COUNT];
        for fg in 0..8 {
            for bg in 0..8 {
                let fg = Color::from_index(fg).unwrap();
                let bg = Color::from_index(bg).unwrap();
                let idx = usize::from(pair_index(fg, bg));
                assert!(!seen[idx], "slot {idx} used twice");
                seen[idx] = true;
            }
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn bright_colors_share_base_slot() {
        assert_eq!(
            pair_index(Color::BrightGreen, Color::BrightRed),
            pair_index(Color::Green, Color::Red)
        );
    }

    // ── Pair table ──────────────────────────────────────────────────────

    #[test]
    fn white_on_black_is_default_pair() {
        let pairs = ColorPairs::new();
        assert_eq!(pairs.get(0), None);
    }

    #[test]
    fn table_holds_registered_colors() {
        let pairs = ColorPairs::new();
        assert_eq!(pairs.get(7), Some((Color::Black, Color::Black)));
        assert_eq!(pairs.get(15), Some((Color::Black, Color::Red)));
        let slot = pair_index(Color::Green, Color::Red);
        assert_eq!(pairs.get(slot), Some((Color::Green, Color::Red)));
        assert_eq!(pairs.get(200), None);
    }

    // ── Rendition ───────────────────────────────────────────────────────

    #[test]
    fn bright_foreground_becomes_bold() {
        let style = Style::new(Attr::empty(), Color::BrightGreen, Color::Red);
        let r = Rendition::of(style);
        assert!(r.bold);
        assert_eq!(r.pair, pair_index(Color::Green, Color::Red));
    }

    #[test]
    fn bright_background_degrades_without_bold() {
        let style = Style::new(Attr::UNDERLINE, Color::White, Color::BrightBlue);
        let r = Rendition::of(style);
        assert!(!r.bold);
        assert_eq!(r.pair, pair_index(Color::White, Color::Blue));
        assert_eq!(r.attr, Attr::UNDERLINE);
    }
}
