//! Frame clock with smoothed frame rate

use std::time::Instant;

/// Weight of the newest frame in the FPS moving average
const FPS_SMOOTHING: f64 = 0.1;

/// Tracks wall time between frames
pub struct FrameClock {
    /// Total elapsed time in seconds
    pub total_time: f64,
    /// Time since last frame in seconds
    pub delta_time: f64,
    /// Frames ticked so far
    pub frame_count: u64,
    /// Exponentially smoothed frames per second
    fps: f64,
    /// Last tick instant
    last_instant: Instant,
    /// Whether this is the first tick
    first_tick: bool,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            total_time: 0.0,
            delta_time: 0.0,
            frame_count: 0,
            fps: 0.0,
            last_instant: Instant::now(),
            first_tick: true,
        }
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock. Call once per frame.
    pub fn tick(&mut self) {
        let now = Instant::now();

        if self.first_tick {
            self.first_tick = false;
            self.last_instant = now;
            self.frame_count += 1;
            self.delta_time = 0.0;
            return;
        }

        let elapsed = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.advance(elapsed);
    }

    /// Account for one frame that took `delta` seconds
    pub fn advance(&mut self, delta: f64) {
        // Clamp so a stalled host does not report a huge frame (max 250ms)
        self.delta_time = delta.clamp(0.0, 0.25);
        self.total_time += self.delta_time;
        self.frame_count += 1;
        if self.delta_time > 0.0 {
            let instant = 1.0 / self.delta_time;
            self.fps = if self.fps == 0.0 {
                instant
            } else {
                self.fps + (instant - self.fps) * FPS_SMOOTHING
            };
        }
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }
}
