// SPDX-License-Identifier: MIT
//
// Terminal key decoder.
//
// Turns raw bytes read from a raw-mode terminal into `Key`s. Only the
// vocabulary the toolkit exposes is decoded:
//
// - CSI and SS3 arrow sequences (`ESC [ A`, `ESC O A`, with or without
//   modifier parameters such as `ESC [ 1 ; 5 A`)
// - CR / LF → Enter, space → Space
// - ASCII and UTF-8 characters → Char
//
// Every other escape sequence is consumed and dropped. A lone ESC is
// ambiguous (Escape key or start of a sequence), so it stays pending until
// more bytes arrive or the caller gives up waiting and calls `flush`.

use crate::event::Key;

/// Incremental byte → key decoder.
///
/// Escape sequences may be split across reads; incomplete tails are kept
/// and completed by the next [`advance`](Self::advance).
#[derive(Debug, Default)]
pub struct KeyDecoder {
    buf: Vec<u8>,
}

impl KeyDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(16),
        }
    }

    /// Feed bytes and return every key that can be decoded so far.
    pub fn advance(&mut self, data: &[u8]) -> Vec<Key> {
        self.buf.extend_from_slice(data);
        let mut keys = Vec::new();
        let mut pos = 0;

        while pos < self.buf.len() {
            match decode(&self.buf[pos..]) {
                Decoded::Key(key, consumed) => {
                    keys.push(key);
                    pos += consumed;
                }
                Decoded::Incomplete => break,
                Decoded::Skip(n) => pos += n,
            }
        }

        if pos > 0 {
            self.buf.drain(..pos);
        }
        keys
    }

    /// Whether bytes are waiting for the rest of a sequence.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.buf.is_empty()
    }

    /// Give up on pending bytes and emit them as literal characters.
    ///
    /// A lone ESC becomes `Char('\x1b')`.
    pub fn flush(&mut self) -> Vec<Key> {
        let keys = self
            .buf
            .iter()
            .filter(|b| b.is_ascii())
            .map(|&b| Key::from(char::from(b)))
            .collect();
        self.buf.clear();
        keys
    }
}

// ─── Stateless Decoding ─────────────────────────────────────────────────────

/// Result of decoding one key from the front of a byte slice.
enum Decoded {
    Key(Key, usize),
    Incomplete,
    Skip(usize),
}

fn decode(buf: &[u8]) -> Decoded {
    match buf[0] {
        0x1B => decode_escape(buf),
        0x0A | 0x0D => Decoded::Key(Key::Enter, 1),
        b @ 0x00..=0x7F => Decoded::Key(Key::from(char::from(b)), 1),
        0xC0..=0xFF => decode_utf8(buf),
        // Stray continuation byte.
        _ => Decoded::Skip(1),
    }
}

fn decode_escape(buf: &[u8]) -> Decoded {
    if buf.len() < 2 {
        return Decoded::Incomplete;
    }
    match buf[1] {
        b'[' => decode_csi(buf),
        b'O' => decode_ss3(buf),
        // Not a sequence we know: the ESC stands on its own.
        _ => Decoded::Key(Key::Char('\x1b'), 1),
    }
}

/// `ESC [ params final`, where final is in `0x40..=0x7E`.
fn decode_csi(buf: &[u8]) -> Decoded {
    let Some(end) = buf[2..].iter().position(|b| (0x40..=0x7E).contains(b)) else {
        return Decoded::Incomplete;
    };
    let consumed = 2 + end + 1;
    arrow(buf[2 + end]).map_or(Decoded::Skip(consumed), |key| Decoded::Key(key, consumed))
}

/// `ESC O final`.
fn decode_ss3(buf: &[u8]) -> Decoded {
    if buf.len() < 3 {
        return Decoded::Incomplete;
    }
    arrow(buf[2]).map_or(Decoded::Skip(3), |key| Decoded::Key(key, 3))
}

const fn arrow(final_byte: u8) -> Option<Key> {
    match final_byte {
        b'A' => Some(Key::Up),
        b'B' => Some(Key::Down),
        b'C' => Some(Key::Right),
        b'D' => Some(Key::Left),
        _ => None,
    }
}

fn decode_utf8(buf: &[u8]) -> Decoded {
    let expected = utf8_char_len(buf[0]);
    if expected == 0 {
        return Decoded::Skip(1);
    }
    if buf.len() < expected {
        return Decoded::Incomplete;
    }
    std::str::from_utf8(&buf[..expected])
        .ok()
        .and_then(|s| s.chars().next())
        .map_or(Decoded::Skip(1), |ch| Decoded::Key(Key::Char(ch), expected))
}

/// Byte length of a UTF-8 character from its lead byte, 0 if invalid.
const fn utf8_char_len(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 0,
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
