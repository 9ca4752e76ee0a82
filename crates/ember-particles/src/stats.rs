//! Per-frame population reporting

use crate::population::PopulationStats;

/// Receives the active/pooled counts after every render
pub trait StatsSink {
    fn report(&mut self, stats: &PopulationStats);
}

impl<F: FnMut(&PopulationStats)> StatsSink for F {
    fn report(&mut self, stats: &PopulationStats) {
        self(stats)
    }
}

/// Discards every report
#[derive(Clone, Copy, Debug, Default)]
pub struct NullStatsSink;

impl StatsSink for NullStatsSink {
    fn report(&mut self, _stats: &PopulationStats) {}
}

/// Logs the counts at debug level every `interval` frames
#[derive(Clone, Copy, Debug)]
pub struct LogStatsSink {
    interval: u64,
    frames: u64,
}

impl LogStatsSink {
    pub fn new(interval: u64) -> Self {
        Self {
            interval: interval.max(1),
            frames: 0,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Default for LogStatsSink {
    fn default() -> Self {
        Self::new(60)
    }
}

impl StatsSink for LogStatsSink {
    fn report(&mut self, stats: &PopulationStats) {
        self.frames += 1;
        if self.frames % self.interval == 0 {
            log::debug!(
                "[particles] frame {}: active={} cached={}",
                self.frames,
                stats.active,
                stats.pooled
            );
        }
    }
}
