// SPDX-License-Identifier: MIT
//
// Recording backend for tests: a fixed size, a FIFO of scripted events,
// and a log of every buffer it was asked to render.

use std::collections::VecDeque;

use tracing::trace;

use super::Display;
use crate::buffer::CellBuffer;
use crate::error::Result;
use crate::event::Event;
use crate::geometry::Size;

/// A display that replays injected events and keeps a copy of each frame.
///
/// When the event queue runs dry, [`wait_for_event`](Display::wait_for_event)
/// ends the run loop without a value.
#[derive(Debug, Clone)]
pub struct RecordDisplay {
    size: Size,
    screen_log: Vec<CellBuffer>,
    events: VecDeque<Event>,
}

impl RecordDisplay {
    /// An 80×25 record display.
    #[must_use]
    pub fn new() -> Self {
        Self::with_size(Size::new(80, 25))
    }

    #[must_use]
    pub const fn with_size(size: Size) -> Self {
        Self {
            size,
            screen_log: Vec::new(),
            events: VecDeque::new(),
        }
    }

    /// Queue `event` behind those already injected.
    pub fn inject_event(&mut self, event: Event) {
        self.events.push_back(event);
    }

    /// Every rendered frame, oldest first.
    #[must_use]
    pub fn screen_log(&self) -> &[CellBuffer] {
        &self.screen_log
    }

    /// Events not delivered yet.
    #[must_use]
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }
}

impl Default for RecordDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RecordDisplay {
    fn display_size(&self) -> Size {
        self.size
    }

    fn wait_for_event(&mut self) -> Result<Option<Event>> {
        Ok(self.events.pop_front())
    }

    fn display_image(&mut self, image: &CellBuffer) -> Result<()> {
        trace!(frame = self.screen_log.len(), "recording frame");
        self.screen_log.push(image.clone());
        Ok(())
    }
}
