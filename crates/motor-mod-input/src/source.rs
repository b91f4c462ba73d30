use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use crossterm::event::{self, Event as CEvent};

/// Where the input module reads terminal events from.
pub trait EventSource {
    /// Wait up to `timeout` for the next event. `Ok(None)` means none arrived.
    fn poll(&mut self, timeout: Duration) -> io::Result<Option<CEvent>>;
}

/// The process terminal, via `crossterm`.
pub struct TerminalEvents;

impl EventSource for TerminalEvents {
    fn poll(&mut self, timeout: Duration) -> io::Result<Option<CEvent>> {
        if event::poll(timeout)? {
            event::read().map(Some)
        } else {
            Ok(None)
        }
    }
}

/// A fixed queue of events, for tests and headless runs.
#[derive(Debug, Default)]
pub struct ScriptedEvents {
    events: VecDeque<CEvent>,
    fail: bool,
}

impl ScriptedEvents {
    pub fn new(events: impl IntoIterator<Item = CEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
            fail: false,
        }
    }

    /// A source whose every poll fails.
    pub fn failing() -> Self {
        Self {
            events: VecDeque::new(),
            fail: true,
        }
    }
}

impl EventSource for ScriptedEvents {
    fn poll(&mut self, _timeout: Duration) -> io::Result<Option<CEvent>> {
        if self.fail {
            return Err(io::Error::other("scripted failure"));
        }
        Ok(self.events.pop_front())
    }
}
