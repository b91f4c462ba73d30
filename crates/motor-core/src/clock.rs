use std::time::{Duration, Instant};

/// Computes the per-frame delta time for the outer loop.
///
/// The orchestrator never paces frames itself. An optional frame cap makes
/// [`tick`](FrameClock::tick) sleep off whatever is left of the frame budget.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<Instant>,
    frame_budget: Option<Duration>,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    /// An uncapped clock.
    pub fn new() -> Self {
        Self {
            last: None,
            frame_budget: None,
        }
    }

    /// A clock that caps the loop at `fps` frames per second. `0` means uncapped.
    pub fn capped(fps: u32) -> Self {
        Self {
            last: None,
            frame_budget: (fps > 0).then(|| Duration::from_secs(1) / fps),
        }
    }

    /// Advance to the next frame and return the elapsed seconds since the
    /// previous one (`0.0` on the first call).
    pub fn tick(&mut self) -> f32 {
        if let (Some(last), Some(budget)) = (self.last, self.frame_budget) {
            let spent = last.elapsed();
            if spent < budget {
                std::thread::sleep(budget - spent);
            }
        }
        self.advance(Instant::now())
    }

    /// Advance to `now` without sleeping.
    pub fn advance(&mut self, now: Instant) -> f32 {
        let dt = self
            .last
            .and_then(|last| now.checked_duration_since(last))
            .unwrap_or(Duration::ZERO);
        self.last = Some(now);
        dt.as_secs_f32()
    }
}
