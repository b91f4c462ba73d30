use std::sync::{Arc, Mutex};
use std::time::Instant;

use crate::fps::FpsCounter;

/// Result of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Every pass succeeded; keep looping.
    Continue,
    /// The input module asked to quit. No pass ran.
    Quit,
    /// A module failed during a pass; the remaining work of the frame was skipped.
    Failed,
}

impl FrameOutcome {
    /// `true` for [`Quit`](FrameOutcome::Quit) and [`Failed`](FrameOutcome::Failed).
    pub fn should_stop(self) -> bool {
        !matches!(self, FrameOutcome::Continue)
    }
}

/// Extension points run at the very start and end of every frame.
///
/// Both run regardless of the quit signal or pass failures.
pub trait FrameHooks {
    fn prepare(&mut self, _frame: u64) {}
    fn finish(&mut self, _frame: u64, _outcome: FrameOutcome) {}
}

/// Copy of the app's [`FrameStats`] that modules can read.
///
/// Refreshed by the app after the prepare hook and again after the finish
/// hook, so a module running inside a pass sees the current frame.
pub type SharedFrameStats = Arc<Mutex<FrameStats>>;

/// Bookkeeping maintained by the built-in prepare/finish hooks.
#[derive(Debug, Clone, Default)]
pub struct FrameStats {
    frames: u64,
    last_dt: f32,
    last_outcome: Option<FrameOutcome>,
    fps: FpsCounter,
}

impl FrameStats {
    /// Start a frame; returns its 1-based number.
    pub(crate) fn prepare(&mut self, dt: f32, now: Instant) -> u64 {
        self.frames += 1;
        self.last_dt = dt;
        self.fps.record(now);
        self.frames
    }

    pub(crate) fn finish(&mut self, outcome: FrameOutcome) {
        self.last_outcome = Some(outcome);
    }

    /// Frames executed so far, including quit and failed frames.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn last_dt(&self) -> f32 {
        self.last_dt
    }

    pub fn last_outcome(&self) -> Option<FrameOutcome> {
        self.last_outcome
    }

    pub fn fps(&self) -> f64 {
        self.fps.fps()
    }
}
