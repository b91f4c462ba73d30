//! Terminal render module.
//!
//! Owns the `ratatui` terminal: it is acquired in `awake`, drawn once per
//! frame in `post_update`, and restored in `clean_up`. Register it last so
//! every other module has finished its frame before the screen is drawn.

pub mod screen;

use std::io::{self, Stdout};

use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use serde::Deserialize;

use motor_config::ConfigNode;
use motor_core::{
    context::AppContext,
    frame::SharedFrameStats,
    logging::{LogBuffer, LogEntry},
    module::Module,
};
use motor_mod_stats::SharedMetrics;

use crate::screen::{draw_screen, ScreenView};

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// `[config.render]` settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderSettings {
    /// Number of recent log records shown under the stats panel.
    pub log_lines: usize,
    /// Skip terminal setup and drawing entirely.
    pub headless: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            log_lines: 8,
            headless: false,
        }
    }
}

pub struct RenderModule {
    settings: RenderSettings,
    terminal: Option<Tui>,
    metrics: SharedMetrics,
    frame_stats: SharedFrameStats,
    logs: LogBuffer,
    title: String,
    organization: String,
    draws: u64,
}

impl RenderModule {
    /// `metrics` is published by the stats module, `frame_stats` by the app
    /// (`App::shared_stats`) and `logs` by the logging subsystem.
    pub fn new(metrics: SharedMetrics, frame_stats: SharedFrameStats, logs: LogBuffer) -> Self {
        Self {
            settings: RenderSettings::default(),
            terminal: None,
            metrics,
            frame_stats,
            logs,
            title: String::new(),
            organization: String::new(),
            draws: 0,
        }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Screens drawn so far. Differs from the app's frame count whenever
    /// this module was inactive or an earlier pass failed.
    pub fn draws(&self) -> u64 {
        self.draws
    }

    fn recent_logs(&self) -> Vec<LogEntry> {
        let Ok(buf) = self.logs.lock() else {
            return Vec::new();
        };
        let skip = buf.len().saturating_sub(self.settings.log_lines);
        buf.iter().skip(skip).cloned().collect()
    }

    /// Frame number, fps and last `dt` as counted by the app.
    fn frame_figures(&self) -> (u64, f64, f32) {
        self.frame_stats
            .lock()
            .map(|s| (s.frames(), s.fps(), s.last_dt()))
            .unwrap_or_default()
    }

    fn draw(&mut self) -> Result<()> {
        let metrics = self
            .metrics
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default();
        let (frames, fps, dt) = self.frame_figures();
        let logs = self.recent_logs();
        let view = ScreenView {
            title: &self.title,
            organization: &self.organization,
            frames,
            fps,
            dt,
            metrics: &metrics,
            logs: &logs,
        };
        if let Some(terminal) = self.terminal.as_mut() {
            terminal
                .draw(|f| draw_screen(f, f.area(), &view))
                .context("failed to draw frame")?;
            self.draws += 1;
        }
        Ok(())
    }
}

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    if let Err(err) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(err).context("failed to enter alternate screen");
    }
    match Terminal::new(CrosstermBackend::new(stdout)) {
        Ok(terminal) => Ok(terminal),
        Err(err) => {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            let _ = disable_raw_mode();
            Err(err).context("failed to create terminal")
        }
    }
}

/// Every step is attempted; the first failure is returned.
fn restore_terminal(mut terminal: Tui) -> Result<()> {
    let raw = disable_raw_mode().context("failed to disable raw mode");
    let screen = execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen");
    let cursor = terminal.show_cursor().context("failed to show cursor");
    first_error([raw, screen, cursor])
}

fn first_error(steps: impl IntoIterator<Item = Result<()>>) -> Result<()> {
    steps
        .into_iter()
        .find(Result::is_err)
        .unwrap_or(Ok(()))
}

impl Module for RenderModule {
    fn name(&self) -> &'static str {
        "render"
    }

    fn awake(&mut self, config: ConfigNode<'_>, ctx: &AppContext) -> Result<()> {
        self.settings = config
            .deserialize()
            .context("invalid [config.render] section")?;
        self.title = ctx.title().to_string();
        self.organization = ctx.organization().to_string();

        if self.settings.headless {
            tracing::info!("render module running headless");
            return Ok(());
        }
        self.terminal = Some(setup_terminal()?);
        tracing::debug!("terminal acquired");
        Ok(())
    }

    fn post_update(&mut self) -> Result<()> {
        self.draw()
    }

    fn clean_up(&mut self) -> Result<()> {
        if let Some(terminal) = self.terminal.take() {
            restore_terminal(terminal)?;
            tracing::debug!(draws = self.draws, "terminal restored");
        }
        Ok(())
    }
}
