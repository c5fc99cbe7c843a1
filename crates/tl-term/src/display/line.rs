// SPDX-License-Identifier: MIT
//
// Line-based fallback backend.
//
// Works on anything that can print lines and read lines: each frame is
// printed inside an ASCII frame, and each event is one line typed at a
// `TextLand> ` prompt. Named commands map to keys, a single character is
// that key, and anything else prints a hint and prompts again.
//
//   /==========\
//   |  Hello   |
//   |          |
//   \==========/
//   TextLand> up

use std::io::{self, BufRead, Stdout, StdinLock, Write};

use tracing::{debug, trace};

use super::Display;
use crate::buffer::CellBuffer;
use crate::error::Result;
use crate::event::{Event, Key};
use crate::geometry::Size;

const PROMPT: &str = "TextLand> ";
const HINT: &str = "Type command name or exactly one letter";

/// A display that prints framed buffers and reads commands line by line.
pub struct LineDisplay<R, W> {
    size: Size,
    input: R,
    output: W,
    line: String,
}

impl LineDisplay<StdinLock<'static>, Stdout> {
    /// A line display on the process's stdin and stdout.
    #[must_use]
    pub fn stdio(size: Size) -> Self {
        Self::new(size, io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> LineDisplay<R, W> {
    #[must_use]
    pub const fn new(size: Size, input: R, output: W) -> Self {
        Self {
            size,
            input,
            output,
            line: String::new(),
        }
    }

    /// The output sink.
    #[must_use]
    pub const fn output(&self) -> &W {
        &self.output
    }

    fn write_frame(&mut self, image: &CellBuffer) -> io::Result<()> {
        let rule = "=".repeat(usize::from(image.width()));
        writeln!(self.output, "/{rule}\\")?;
        for y in 0..image.height() {
            writeln!(self.output, "|{}|", image.row_text(y))?;
        }
        writeln!(self.output, "\\{rule}/")?;
        self.output.flush()
    }
}

/// Map one input line to a key.
fn command_key(text: &str) -> Option<Key> {
    match text {
        "up" => Some(Key::Up),
        "down" => Some(Key::Down),
        "left" => Some(Key::Left),
        "right" => Some(Key::Right),
        "" => Some(Key::Enter),
        _ => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => Some(Key::from(ch)),
                _ => None,
            }
        }
    }
}

impl<R: BufRead, W: Write> Display for LineDisplay<R, W> {
    fn display_size(&self) -> Size {
        self.size
    }

    fn wait_for_event(&mut self) -> Result<Option<Event>> {
        loop {
            write!(self.output, "{PROMPT}")?;
            self.output.flush()?;

            self.line.clear();
            if self.input.read_line(&mut self.line)? == 0 {
                debug!("line display input closed");
                return Ok(None);
            }

            let text = self.line.trim_end_matches(['\n', '\r']);
            if let Some(key) = command_key(text) {
                trace!(?key, "line command");
                return Ok(Some(Event::key(key)));
            }
            writeln!(self.output, "{HINT}")?;
        }
    }

    fn display_image(&mut self, image: &CellBuffer) -> Result<()> {
        self.write_frame(image)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Attr;
    use crate::color::Color;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn display(input: &str) -> LineDisplay<Cursor<Vec<u8>>, Vec<u8>> {
        LineDisplay::new(Size::new(4, 2), Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output(display: &LineDisplay<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(display.output().clone()).unwrap()
    }

    // ── Rendering ───────────────────────────────────────────────────────

    #[test]
    fn frame_surrounds_buffer() {
        let mut display = display("");
        let mut image = CellBuffer::new(Size::new(4, 2));
        image.put(1, 0, 'h', Attr::UNDERLINE, Color::Red, Color::Black);
        image.put(2, 1, 'i', Attr::NORMAL, Color::White, Color::Black);
        display.display_image(&image).unwrap();
        assert_eq!(output(&display), "/====\\\n| h  |\n|  i |\n\\====/\n");
    }

    // ── Commands ────────────────────────────────────────────────────────

    #[test]
    fn named_commands() {
        let mut display = display("up\ndown\nleft\nright\n\n");
        let keys: Vec<Event> = std::iter::from_fn(|| display.wait_for_event().unwrap()).collect();
        assert_eq!(
            keys,
            vec![
                Event::key(Key::Up),
                Event::key(Key::Down),
                Event::key(Key::Left),
                Event::key(Key::Right),
                Event::key(Key::Enter),
            ]
        );
    }

    #[test]
    fn single_character_is_a_key() {
        let mut display = display("q\n \nß\r\n");
        assert_eq!(display.wait_for_event().unwrap(), Some(Event::key(Key::Char('q'))));
        assert_eq!(display.wait_for_event().unwrap(), Some(Event::key(Key::Space)));
        assert_eq!(display.wait_for_event().unwrap(), Some(Event::key(Key::Char('ß'))));
    }

    #[test]
    fn invalid_input_reprompts() {
        let mut display = display("hello\nx\n");
        assert_eq!(display.wait_for_event().unwrap(), Some(Event::key(Key::Char('x'))));
        assert_eq!(
            output(&display),
            "TextLand> Type command name or exactly one letter\nTextLand> "
        );
    }

    #[test]
    fn end_of_input_stops() {
        let mut display = display("a");
        assert_eq!(display.wait_for_event().unwrap(), Some(Event::key(Key::Char('a'))));
        assert_eq!(display.wait_for_event().unwrap(), None);
    }

    #[test]
    fn size_is_configured() {
        assert_eq!(display("").display_size(), Size::new(4, 2));
    }
}
