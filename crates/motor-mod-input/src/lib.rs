//! Terminal input module.
//!
//! Polls `crossterm` events once per frame during `pre_update` and owns the
//! quit signal the orchestrator checks at the start of every frame.

pub mod source;

use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{Event as CEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use serde::Deserialize;

use motor_config::ConfigNode;
use motor_core::{context::AppContext, module::Module};

use crate::source::{EventSource, TerminalEvents};

/// `[config.input]` settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputSettings {
    /// How long the first poll of a frame may block, in milliseconds.
    pub poll_ms: u64,
    /// Upper bound on events drained per frame.
    pub max_events: usize,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            poll_ms: 0,
            max_events: 64,
        }
    }
}

/// Return `true` for `q`, `Esc` and `Ctrl-C`.
pub fn is_quit_key(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

pub struct InputModule {
    source: Box<dyn EventSource>,
    settings: InputSettings,
    quit: bool,
    frame_keys: Vec<KeyCode>,
    terminal_size: Option<(u16, u16)>,
    events_seen: u64,
}

impl Default for InputModule {
    fn default() -> Self {
        Self::new()
    }
}

impl InputModule {
    /// Read events from the process terminal.
    pub fn new() -> Self {
        Self::with_source(Box::new(TerminalEvents))
    }

    pub fn with_source(source: Box<dyn EventSource>) -> Self {
        Self {
            source,
            settings: InputSettings::default(),
            quit: false,
            frame_keys: Vec::new(),
            terminal_size: None,
            events_seen: 0,
        }
    }

    /// Keys pressed during the current frame, in arrival order.
    pub fn frame_keys(&self) -> &[KeyCode] {
        &self.frame_keys
    }

    /// Most recent size reported by a resize event.
    pub fn terminal_size(&self) -> Option<(u16, u16)> {
        self.terminal_size
    }

    pub fn settings(&self) -> &InputSettings {
        &self.settings
    }

    fn handle(&mut self, event: CEvent) {
        self.events_seen += 1;
        match event {
            CEvent::Key(key) if key.kind != KeyEventKind::Release => {
                if is_quit_key(&key) {
                    if !self.quit {
                        tracing::info!(key = ?key.code, "quit key pressed");
                    }
                    self.quit = true;
                } else {
                    self.frame_keys.push(key.code);
                }
            }
            CEvent::Resize(cols, rows) => {
                tracing::debug!(cols, rows, "terminal resized");
                self.terminal_size = Some((cols, rows));
            }
            _ => {}
        }
    }
}

impl Module for InputModule {
    fn name(&self) -> &'static str {
        "input"
    }

    fn awake(&mut self, config: ConfigNode<'_>, _ctx: &AppContext) -> Result<()> {
        self.settings = config
            .deserialize()
            .context("invalid [config.input] section")?;
        Ok(())
    }

    fn pre_update(&mut self) -> Result<()> {
        self.frame_keys.clear();

        let mut timeout = Duration::from_millis(self.settings.poll_ms);
        for _ in 0..self.settings.max_events {
            let event = self
                .source
                .poll(timeout)
                .context("failed to poll terminal events")?;
            match event {
                Some(event) => self.handle(event),
                None => break,
            }
            timeout = Duration::ZERO;
        }
        Ok(())
    }

    fn clean_up(&mut self) -> Result<()> {
        tracing::debug!(events = self.events_seen, "input module released");
        Ok(())
    }

    fn quit_requested(&self) -> bool {
        self.quit
    }
}
