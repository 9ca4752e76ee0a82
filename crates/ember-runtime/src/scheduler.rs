//! Pacing between frames

use std::time::{Duration, Instant};

/// Blocks until the next frame should run
pub trait RefreshScheduler {
    fn wait_for_next_frame(&mut self);
}

/// Runs frames back to back, for headless rendering and tests
#[derive(Clone, Copy, Debug, Default)]
pub struct ImmediateScheduler;

impl RefreshScheduler for ImmediateScheduler {
    fn wait_for_next_frame(&mut self) {}
}

/// Sleeps to hold a fixed refresh rate
#[derive(Clone, Debug)]
pub struct IntervalScheduler {
    interval: Duration,
    next: Option<Instant>,
}

impl IntervalScheduler {
    /// Scheduler targeting `fps` frames per second (at least 1)
    pub fn new(fps: f64) -> Self {
        Self {
            interval: Duration::from_secs_f64(1.0 / fps.max(1.0)),
            next: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Default for IntervalScheduler {
    fn default() -> Self {
        Self::new(60.0)
    }
}

impl RefreshScheduler for IntervalScheduler {
    fn wait_for_next_frame(&mut self) {
        let now = Instant::now();
        let Some(next) = self.next else {
            self.next = Some(now + self.interval);
            return;
        };
        if next > now {
            std::thread::sleep(next - now);
        }
        // Fell behind by more than a frame: resync instead of bursting
        let after = next + self.interval;
        self.next = Some(if after < now { now + self.interval } else { after });
    }
}
