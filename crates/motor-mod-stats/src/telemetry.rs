//! Interval-gated process and system metrics via `sysinfo`.

use std::time::{Duration, Instant};

use sysinfo::{Pid, ProcessesToUpdate, System};

/// A point-in-time sample of system and engine-process metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSnapshot {
    /// Global CPU usage (0.0–100.0). NaN until the first sample.
    pub cpu_global: f32,
    pub core_count: usize,
    pub mem_total: u64,
    pub mem_used: u64,
    /// Resident set size of this process in bytes.
    pub self_rss: Option<u64>,
    pub self_cpu: Option<f32>,
    /// Number of samples taken so far.
    pub samples: u64,
}

impl Default for MetricsSnapshot {
    fn default() -> Self {
        Self {
            cpu_global: f32::NAN,
            core_count: 0,
            mem_total: 0,
            mem_used: 0,
            self_rss: None,
            self_cpu: None,
            samples: 0,
        }
    }
}

/// Wraps [`sysinfo::System`] and only refreshes once `interval` has elapsed.
pub struct TelemetryCollector {
    sys: System,
    self_pid: Pid,
    interval: Duration,
    last_refresh: Option<Instant>,
    snapshot: MetricsSnapshot,
}

impl TelemetryCollector {
    pub fn with_interval(interval: Duration) -> Self {
        let mut sys = System::new();
        // The first CPU reading is always 0%; take a baseline now.
        sys.refresh_cpu_usage();

        Self {
            sys,
            self_pid: Pid::from_u32(std::process::id()),
            interval,
            last_refresh: None,
            snapshot: MetricsSnapshot::default(),
        }
    }

    /// Sample if the interval has elapsed. Returns `true` when it did.
    pub fn maybe_refresh(&mut self, now: Instant) -> bool {
        let due = self.last_refresh.map_or(true, |last| {
            now.checked_duration_since(last)
                .is_some_and(|elapsed| elapsed >= self.interval)
        });
        if !due {
            return false;
        }
        self.last_refresh = Some(now);

        self.sys.refresh_cpu_usage();
        self.sys.refresh_memory();
        self.sys
            .refresh_processes(ProcessesToUpdate::Some(&[self.self_pid]), false);

        let process = self.sys.process(self.self_pid);
        self.snapshot = MetricsSnapshot {
            cpu_global: self.sys.global_cpu_usage(),
            core_count: self.sys.cpus().len(),
            mem_total: self.sys.total_memory(),
            mem_used: self.sys.used_memory(),
            self_rss: process.map(|p| p.memory()),
            self_cpu: process.map(|p| p.cpu_usage()),
            samples: self.snapshot.samples + 1,
        };
        true
    }

    pub fn snapshot(&self) -> &MetricsSnapshot {
        &self.snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_call_always_refreshes() {
        let mut c = TelemetryCollector::with_interval(Duration::from_secs(60));
        assert!(c.maybe_refresh(Instant::now()));
        assert_eq!(c.snapshot().samples, 1);
    }

    #[test]
    fn second_call_within_interval_skips() {
        let mut c = TelemetryCollector::with_interval(Duration::from_secs(60));
        let now = Instant::now();
        assert!(c.maybe_refresh(now));
        assert!(!c.maybe_refresh(now + Duration::from_secs(1)));
        assert_eq!(c.snapshot().samples, 1);
    }

    #[test]
    fn refresh_after_interval_fires() {
        let mut c = TelemetryCollector::with_interval(Duration::from_millis(10));
        let t0 = Instant::now();
        assert!(c.maybe_refresh(t0));
        assert!(c.maybe_refresh(t0 + Duration::from_millis(11)));
        assert_eq!(c.snapshot().samples, 2);
    }

    #[test]
    fn sample_reports_memory_and_self_process() {
        let mut c = TelemetryCollector::with_interval(Duration::from_secs(1));
        c.maybe_refresh(Instant::now());
        assert!(c.snapshot().mem_total > 0);
        assert!(c.snapshot().core_count > 0);
        assert!(c.snapshot().self_rss.is_some());
    }

    #[test]
    fn default_snapshot_has_no_cpu_sample() {
        let c = TelemetryCollector::with_interval(Duration::from_secs(1));
        assert!(c.snapshot().cpu_global.is_nan());
    }
}
