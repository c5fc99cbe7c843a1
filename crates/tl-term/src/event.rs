// SPDX-License-Identifier: MIT
//
// Events a display delivers to the application.
//
// Every backend speaks the same small vocabulary: a resize carrying the new
// display size, a key (a character or one of a handful of named keys), or
// a mouse report. Events are plain values; a backend creates one, the run
// loop hands it to the application, and it is consumed there.

use crate::geometry::Size;

/// A notification produced by a display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// The display now has this size.
    Resize(Size),
    /// A key was pressed.
    Keyboard(KeyboardData),
    /// A mouse button was pressed at a cell.
    ///
    /// None of the bundled backends report the mouse; the variant exists
    /// so applications can match on it without a wildcard.
    Mouse(MouseData),
}

impl Event {
    /// A keyboard event for `key`.
    #[inline]
    #[must_use]
    pub const fn key(key: Key) -> Self {
        Self::Keyboard(KeyboardData { key })
    }

    /// The key, if this is a keyboard event.
    #[inline]
    #[must_use]
    pub const fn as_key(&self) -> Option<Key> {
        match self {
            Self::Keyboard(data) => Some(data.key),
            _ => None,
        }
    }
}

/// Payload of [`Event::Keyboard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardData {
    pub key: Key,
}

/// A key: either a character or one of the named keys every backend can
/// produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Up,
    Down,
    Left,
    Right,
    Space,
    Enter,
}

impl From<char> for Key {
    /// Space and line terminators become their named keys.
    fn from(ch: char) -> Self {
        match ch {
            ' ' => Self::Space,
            '\n' | '\r' => Self::Enter,
            c => Self::Char(c),
        }
    }
}

/// Payload of [`Event::Mouse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseData {
    /// 0-indexed column.
    pub x: u16,
    /// 0-indexed row.
    pub y: u16,
    pub button: MouseButton,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_from_char_names_space_and_enter() {
        assert_eq!(Key::from(' '), Key::Space);
        assert_eq!(Key::from('\n'), Key::Enter);
        assert_eq!(Key::from('\r'), Key::Enter);
        assert_eq!(Key::from('q'), Key::Char('q'));
    }

    #[test]
    fn as_key_only_for_keyboard_events() {
        assert_eq!(Event::key(Key::Up).as_key(), Some(Key::Up));
        assert_eq!(Event::Resize(Size::new(1, 1)).as_key(), None);
        let click = Event::Mouse(MouseData {
            x: 3,
            y: 4,
            button: MouseButton::Left,
        });
        assert_eq!(click.as_key(), None);
    }
}
