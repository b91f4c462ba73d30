//! System-stats module.
//!
//! Samples process and system metrics at a configurable interval, logs them,
//! and publishes the latest sample through a [`SharedMetrics`] handle so
//! modules registered after it can display them.

pub mod format;
pub mod telemetry;

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use serde::Deserialize;

use motor_config::ConfigNode;
use motor_core::{context::AppContext, module::Module};

use crate::format::{format_bytes, format_percent};
use crate::telemetry::{MetricsSnapshot, TelemetryCollector};

/// Latest metrics sample, shared with consumer modules.
pub type SharedMetrics = Arc<Mutex<MetricsSnapshot>>;

/// `[config.stats]` settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StatsSettings {
    /// Milliseconds between samples.
    pub interval_ms: u64,
    /// Emit an `info` record for every sample instead of `debug`.
    pub verbose: bool,
}

impl Default for StatsSettings {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            verbose: false,
        }
    }
}

pub struct StatsModule {
    settings: StatsSettings,
    collector: Option<TelemetryCollector>,
    shared: SharedMetrics,
}

impl Default for StatsModule {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsModule {
    pub fn new() -> Self {
        Self {
            settings: StatsSettings::default(),
            collector: None,
            shared: SharedMetrics::default(),
        }
    }

    /// Handle to the latest sample. Clone it into consumers at construction.
    pub fn metrics(&self) -> SharedMetrics {
        self.shared.clone()
    }

    pub fn settings(&self) -> &StatsSettings {
        &self.settings
    }

    fn publish(&self, snapshot: &MetricsSnapshot) {
        if let Ok(mut shared) = self.shared.lock() {
            *shared = snapshot.clone();
        }

        let cpu = format_percent(snapshot.cpu_global);
        let mem = format!(
            "{} / {}",
            format_bytes(snapshot.mem_used),
            format_bytes(snapshot.mem_total)
        );
        let rss = snapshot.self_rss.map(format_bytes).unwrap_or_else(|| "--".into());
        if self.settings.verbose {
            tracing::info!(%cpu, %mem, %rss, sample = snapshot.samples, "stats sample");
        } else {
            tracing::debug!(%cpu, %mem, %rss, sample = snapshot.samples, "stats sample");
        }
    }
}

impl Module for StatsModule {
    fn name(&self) -> &'static str {
        "stats"
    }

    fn awake(&mut self, config: ConfigNode<'_>, _ctx: &AppContext) -> Result<()> {
        self.settings = config
            .deserialize()
            .context("invalid [config.stats] section")?;
        if self.settings.interval_ms == 0 {
            anyhow::bail!("stats.interval_ms must be greater than zero");
        }
        self.collector = Some(TelemetryCollector::with_interval(Duration::from_millis(
            self.settings.interval_ms,
        )));
        tracing::debug!(interval_ms = self.settings.interval_ms, "stats collector ready");
        Ok(())
    }

    fn update(&mut self, _dt: f32) -> Result<()> {
        let Some(collector) = self.collector.as_mut() else {
            anyhow::bail!("stats collector used before awake");
        };
        if collector.maybe_refresh(Instant::now()) {
            let snapshot = collector.snapshot().clone();
            self.publish(&snapshot);
        }
        Ok(())
    }

    fn clean_up(&mut self) -> Result<()> {
        if let Some(collector) = self.collector.take() {
            tracing::info!(samples = collector.snapshot().samples, "stats collector released");
        }
        Ok(())
    }
}
