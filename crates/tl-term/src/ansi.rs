// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Pure functions that write escape sequences to any `impl Write`. No state,
// no decisions about when to emit: the terminal display decides that. This
// module only knows the byte-level encoding of the commands we need.
//
// All cursor positions are 0-indexed in our API and converted to 1-indexed
// for the terminal (ANSI standard uses 1-based coordinates).
use std::io::{self, Write};

use crate::cell::Attr;
use crate::color::{ColorPairs, Rendition};

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Move the cursor to `(x, y)` using CUP (Cursor Position).
#[inline]
pub fn cursor_to(w: &mut impl Write, x: u16, y: u16) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1)
}

/// Hide the cursor (DECTCEM reset).
#[inline]
pub fn cursor_hide(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}

/// Show the cursor (DECTCEM set).
#[inline]
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

// ─── Screen ──────────────────────────────────────────────────────────────────

/// Clear the entire screen (ED 2).
#[inline]
pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[2J")
}

/// Reset all SGR attributes to terminal defaults (SGR 0).
#[inline]
pub fn reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[0m")
}

/// Insert `n` blank characters at the cursor, shifting the rest of the
/// line right (ICH). The cursor does not move.
#[inline]
pub fn insert_chars(w: &mut impl Write, n: u16) -> io::Result<()> {
    if n == 1 {
        w.write_all(b"\x1b[@")
    } else {
        write!(w, "\x1b[{n}@")
    }
}

// ─── Alternate Screen ───────────────────────────────────────────────────────

/// Enter the alternate screen buffer (DEC Private Mode 1049).
#[inline]
pub fn enter_alt_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1049h")
}

/// Exit the alternate screen buffer and restore original content.
#[inline]
pub fn exit_alt_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1049l")
}

// ─── Rendition ──────────────────────────────────────────────────────────────

/// Select a rendition as one SGR sequence, starting from a reset.
///
/// Layout: `0`, then `1` for bold, `4` underline, `7` reverse, then the
/// pair's colors as `3x;4x`, or `39;49` for the default pair.
///
/// ```
/// use tl_term::ansi;
/// use tl_term::color::{ColorPairs, Rendition};
/// use tl_term::{Attr, Color, Style};
///
/// let pairs = ColorPairs::new();
/// let r = Rendition::of(Style::new(Attr::UNDERLINE, Color::BrightGreen, Color::Red));
/// let mut out = Vec::new();
/// ansi::rendition(&mut out, r, &pairs)?;
/// assert_eq!(out, b"\x1b[0;1;4;32;41m");
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn rendition(w: &mut impl Write, r: Rendition, pairs: &ColorPairs) -> io::Result<()> {
    w.write_all(b"\x1b[0")?;
    if r.bold {
        w.write_all(b";1")?;
    }
    if r.attr.contains(Attr::UNDERLINE) {
        w.write_all(b";4")?;
    }
    if r.attr.contains(Attr::REVERSE) {
        w.write_all(b";7")?;
    }
    match pairs.get(r.pair) {
        Some((fg, bg)) => write!(w, ";{};{}m", 30 + fg.index(), 40 + bg.index()),
        None => w.write_all(b";39;49m"),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Style;
    use crate::color::Color;
    use pretty_assertions::assert_eq;

    /// Helper: run an ANSI function and return its output as a string.
    fn emit<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn rend(style: Style) -> String {
        let pairs = ColorPairs::new();
        emit(|w| rendition(w, Rendition::of(style), &pairs))
    }

    // ── Cursor ──────────────────────────────────────────────────────────

    #[test]
    fn cursor_to_origin() {
        assert_eq!(emit(|w| cursor_to(w, 0, 0)), "\x1b[1;1H");
    }

    #[test]
    fn cursor_to_position() {
        assert_eq!(emit(|w| cursor_to(w, 10, 20)), "\x1b[21;11H");
    }

    #[test]
    fn cursor_to_max_does_not_overflow() {
        assert_eq!(emit(|w| cursor_to(w, u16::MAX, u16::MAX)), "\x1b[65536;65536H");
    }

    #[test]
    fn cursor_visibility() {
        assert_eq!(emit(|w| cursor_hide(w)), "\x1b[?25l");
        assert_eq!(emit(|w| cursor_show(w)), "\x1b[?25h");
    }

    // ── Screen ──────────────────────────────────────────────────────────

    #[test]
    fn screen_sequences() {
        assert_eq!(emit(|w| clear_screen(w)), "\x1b[2J");
        assert_eq!(emit(|w| reset(w)), "\x1b[0m");
        assert_eq!(emit(|w| enter_alt_screen(w)), "\x1b[?1049h");
        assert_eq!(emit(|w| exit_alt_screen(w)), "\x1b[?1049l");
    }

    #[test]
    fn insert_chars_sequences() {
        assert_eq!(emit(|w| insert_chars(w, 1)), "\x1b[@");
        assert_eq!(emit(|w| insert_chars(w, 3)), "\x1b[3@");
    }

    // ── Rendition ───────────────────────────────────────────────────────

    #[test]
    fn white_on_black_uses_terminal_defaults() {
        assert_eq!(rend(Style::TEXT), "\x1b[0;39;49m");
    }

    #[test]
    fn default_cell_style_is_black_on_black() {
        assert_eq!(rend(Style::DEFAULT), "\x1b[0;30;40m");
    }

    #[test]
    fn reverse_and_underline() {
        let style = Style::new(Attr::REVERSE | Attr::UNDERLINE, Color::Yellow, Color::Blue);
        assert_eq!(rend(style), "\x1b[0;4;7;33;44m");
    }

    #[test]
    fn bright_background_degrades() {
        let style = Style::new(Attr::NORMAL, Color::Red, Color::BrightCyan);
        assert_eq!(rend(style), "\x1b[0;31;46m");
    }
}
