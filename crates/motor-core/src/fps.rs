use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Frames-per-second over a sliding time window.
///
/// Every [`record`](FpsCounter::record) stores the frame's start instant and
/// evicts instants that fell out of the window.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    frames: VecDeque<Instant>,
    window: Duration,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl FpsCounter {
    pub fn new(window: Duration) -> Self {
        Self {
            frames: VecDeque::new(),
            window,
        }
    }

    /// Record a frame that started at `now`.
    pub fn record(&mut self, now: Instant) {
        self.frames.push_back(now);
        let cutoff = now.checked_sub(self.window).unwrap_or(now);
        while self.frames.front().is_some_and(|&t| t < cutoff) {
            self.frames.pop_front();
        }
    }

    /// Frames in the window divided by the window length.
    ///
    /// `0.0` until at least two frames have been recorded.
    pub fn fps(&self) -> f64 {
        if self.frames.len() < 2 {
            return 0.0;
        }
        self.frames.len() as f64 / self.window.as_secs_f64()
    }

    pub fn frames_in_window(&self) -> usize {
        self.frames.len()
    }
}
